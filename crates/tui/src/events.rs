use std::time::{Duration, Instant};

use crossterm::event::{self, Event, MouseButton, MouseEventKind};
use ratatui::{backend::Backend, Terminal};

use crate::app::{App, Focus, View, CARD_LINES};
use crate::ui;

pub fn run<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> anyhow::Result<()> {
    let mut last_draw = Instant::now();
    let heartbeat = Duration::from_millis(500);
    loop {
        if app.dirty || last_draw.elapsed() >= heartbeat {
            terminal.draw(|f| ui::draw(f, app))?;
            app.dirty = false;
            last_draw = Instant::now();
        }
        let cursor_visible =
            matches!(app.focus, Focus::Input) && app.region_picker.is_none() && !app.show_help;
        if cursor_visible {
            let _ = terminal.show_cursor();
        } else {
            let _ = terminal.hide_cursor();
        }

        if event::poll(Duration::from_millis(120))? {
            match event::read()? {
                Event::Key(key) => {
                    app.on_key(key);
                }
                Event::Paste(s) => {
                    if matches!(app.focus, Focus::Input) && app.region_picker.is_none() {
                        app.insert_text(&s);
                        app.dirty = true;
                    }
                }
                Event::Resize(_, _) => {
                    app.dirty = true;
                }
                Event::Mouse(me) => {
                    if app.show_help || app.region_picker.is_some() {
                        // popups swallow mouse input
                    } else if let Some(area) = app.main_area {
                        let x = me.column;
                        let y = me.row;
                        let inside = x >= area.x
                            && x < area.x + area.width
                            && y >= area.y
                            && y < area.y + area.height;
                        if inside && matches!(app.view, View::Cards) && !app.loading {
                            match me.kind {
                                MouseEventKind::ScrollUp => {
                                    app.card_select_up();
                                    app.dirty = true;
                                }
                                MouseEventKind::ScrollDown => {
                                    app.card_select_down();
                                    app.dirty = true;
                                }
                                MouseEventKind::Down(MouseButton::Left) => {
                                    if y > area.y && y < area.y + area.height - 1 {
                                        let rel = (y - (area.y + 1)) as usize;
                                        let idx = app.cards_scroll + rel / CARD_LINES;
                                        if idx < app.cards.len() {
                                            app.selected_card = idx;
                                            app.ensure_card_visible();
                                            app.focus = Focus::Main;
                                            app.open_selected_card();
                                            app.dirty = true;
                                        }
                                    }
                                }
                                _ => {}
                            }
                        }
                    }
                }
                _ => {}
            }
        }

        app.on_tick();

        if app.should_quit {
            let _ = crate::persist::save_state(app);
            break;
        }
    }
    Ok(())
}
