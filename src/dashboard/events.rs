use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};

use super::app::{Action, App, Modal, View};
use super::forms::FieldKind;
use crate::api::RentApi;
use crate::cli::ExportKind;

/// Applies a key press to the app. Anything that has to reach the server is
/// handed back as an [`Action`] for the runner to perform.
pub fn handle_key_event<A: RentApi>(key: KeyEvent, app: &mut App<A>) -> Option<Action> {
    // Nothing is applied while a request is in flight.
    if key.kind == KeyEventKind::Release || app.busy {
        return None;
    }
    if app.modal.is_some() {
        return handle_modal_key(key, app);
    }

    match key.code {
        KeyCode::Esc => {
            app.tracker.notifications_mut().dismiss();
        }
        KeyCode::Tab => return app.set_view(app.view.next()),
        KeyCode::Char('1') => return app.set_view(View::Properties),
        KeyCode::Char('2') => return app.set_view(View::Monthly),
        KeyCode::Char('3') => return app.set_view(View::Records),
        KeyCode::Left | KeyCode::Char('[') => {
            app.prev_month();
        }
        KeyCode::Right | KeyCode::Char(']') => {
            app.next_month();
        }
        KeyCode::Up | KeyCode::Char('k') => {
            app.select_prev();
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.select_next();
        }
        KeyCode::Char('a') => {
            app.open_add_form();
        }
        KeyCode::Char('e') => {
            app.open_edit_form();
        }
        KeyCode::Char('d') | KeyCode::Delete => {
            app.open_delete_confirm();
        }
        KeyCode::Char(' ') | KeyCode::Char('t') if app.view != View::Records => {
            return app.selected_property().map(|p| Action::Toggle(p.id.clone()));
        }
        KeyCode::Enter => match app.view {
            View::Properties => app.open_collection(),
            View::Monthly => app.open_rent_details(),
            View::Records => {}
        },
        KeyCode::Char('c') if app.view != View::Records => {
            app.open_collection();
        }
        KeyCode::Char('r') => {
            return Some(match app.view {
                View::Records => Action::LoadRecords,
                _ => Action::Reload,
            });
        }
        KeyCode::Char('x') => return Some(Action::Export(ExportKind::Json)),
        KeyCode::Char('X') => return Some(Action::Export(ExportKind::Excel)),
        KeyCode::Char('?') => {
            app.modal = Some(Modal::Help);
        }
        _ => {}
    }
    None
}

fn handle_modal_key<A: RentApi>(key: KeyEvent, app: &mut App<A>) -> Option<Action> {
    let modal = app.modal.as_mut()?;

    match modal {
        Modal::Help | Modal::Receipt(_) => {
            app.close_modal();
            None
        }
        Modal::ConfirmDelete { id, .. } => match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                let id = id.clone();
                app.close_modal();
                Some(Action::Delete(id))
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                app.close_modal();
                None
            }
            _ => None,
        },
        Modal::AddProperty(form)
        | Modal::EditProperty { form, .. }
        | Modal::RentDetails { form, .. }
        | Modal::Collect { form, .. } => {
            match key.code {
                KeyCode::Esc => app.close_modal(),
                KeyCode::Enter => return Some(Action::Submit),
                KeyCode::Tab | KeyCode::Down => form.next_field(),
                KeyCode::BackTab | KeyCode::Up => form.prev_field(),
                KeyCode::Backspace => form.backspace(),
                KeyCode::Char(' ')
                    if form.focused().map(|f| f.kind) == Some(FieldKind::Checkbox) =>
                {
                    form.input(' ');
                    app.sync_received_date();
                }
                KeyCode::Char(c) => form.input(c),
                _ => {}
            }
            None
        }
    }
}
