use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Row, Table, TableState},
    Frame, Terminal,
};
use std::io;
use std::time::Duration;
use tracing::info;

use crate::catalog::Catalog;
use crate::dialog::{DialogOutcome, EditDialog, EditField};
use crate::status::{Notice, Tone};
use crate::utils;

const FORM_LABEL_WIDTH: u16 = 7;
const DIALOG_LABEL_WIDTH: u16 = 15;

#[derive(Clone, Copy, PartialEq, Debug)]
pub enum FormField {
    Name,
    Price,
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub enum InputMode {
    Browse,
    Form(FormField),
    Editing,
}

pub struct App {
    pub catalog: Catalog,
    pub state: TableState,
    pub input_mode: InputMode,
    pub dialog: Option<EditDialog>,
    quit: bool,
}

impl App {
    pub fn new(catalog: Catalog) -> Self {
        let mut app = App {
            catalog,
            state: TableState::default(),
            input_mode: InputMode::Browse,
            dialog: None,
            quit: false,
        };
        app.sync_selection();
        app
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    pub fn selected(&self) -> Option<usize> {
        self.state.selected()
    }

    // Keeps the selection inside the list after it was reloaded.
    fn sync_selection(&mut self) {
        let len = self.catalog.products().len();
        let selected = match (self.state.selected(), len) {
            (_, 0) => None,
            (Some(i), _) => Some(i.min(len - 1)),
            (None, _) => Some(0),
        };
        self.state.select(selected);
    }

    pub fn next(&mut self) {
        let len = self.catalog.products().len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        };
        self.state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let len = self.catalog.products().len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.state.select(Some(i));
    }

    pub fn refresh(&mut self) {
        self.catalog.refresh();
        self.sync_selection();
    }

    pub fn save_form(&mut self) {
        if self.catalog.add_product() {
            self.sync_selection();
            self.input_mode = InputMode::Form(FormField::Name);
        }
    }

    pub fn delete_selected(&mut self) {
        if self.catalog.delete_product(self.selected()) {
            self.sync_selection();
        }
    }

    pub fn open_edit_dialog(&mut self) {
        match self.catalog.product_at(self.selected()).cloned() {
            Some(product) => {
                self.dialog = Some(EditDialog::new(product));
                self.input_mode = InputMode::Editing;
            }
            None => self.catalog.status.show(Notice::error("Please select a product")),
        }
    }

    pub fn submit_dialog(&mut self) {
        let Some(mut dialog) = self.dialog.take() else {
            return;
        };
        match dialog.submit(&mut self.catalog) {
            DialogOutcome::Stay => self.dialog = Some(dialog),
            DialogOutcome::Close => {
                self.input_mode = InputMode::Browse;
                self.sync_selection();
            }
        }
    }

    pub fn cancel_dialog(&mut self) {
        self.dialog = None;
        self.input_mode = InputMode::Browse;
    }

    fn form_input(&mut self, field: FormField) -> &mut String {
        match field {
            FormField::Name => &mut self.catalog.form.name,
            FormField::Price => &mut self.catalog.form.price,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.quit = true;
            return;
        }

        match self.input_mode {
            InputMode::Browse => match key.code {
                KeyCode::Char('q') | KeyCode::Esc => self.quit = true,
                KeyCode::Char('j') | KeyCode::Down => self.next(),
                KeyCode::Char('k') | KeyCode::Up => self.previous(),
                KeyCode::Char('a') | KeyCode::Tab => {
                    self.input_mode = InputMode::Form(FormField::Name);
                }
                KeyCode::Char('d') | KeyCode::Delete => self.delete_selected(),
                KeyCode::Char('e') | KeyCode::Enter => self.open_edit_dialog(),
                KeyCode::Char('r') => self.refresh(),
                _ => {}
            },
            InputMode::Form(field) => match key.code {
                KeyCode::Esc => self.input_mode = InputMode::Browse,
                KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
                    self.input_mode = InputMode::Form(match field {
                        FormField::Name => FormField::Price,
                        FormField::Price => FormField::Name,
                    });
                }
                KeyCode::Enter => self.save_form(),
                KeyCode::Backspace => {
                    self.form_input(field).pop();
                }
                KeyCode::Char(c) => self.form_input(field).push(c),
                _ => {}
            },
            InputMode::Editing => {
                let Some(dialog) = self.dialog.as_mut() else {
                    self.input_mode = InputMode::Browse;
                    return;
                };
                match key.code {
                    KeyCode::Esc => self.cancel_dialog(),
                    KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
                        dialog.next_field();
                    }
                    KeyCode::Enter => self.submit_dialog(),
                    KeyCode::Backspace => {
                        dialog.focused_input().pop();
                    }
                    KeyCode::Char(c) => dialog.focused_input().push(c),
                    _ => {}
                }
            }
        }
    }
}

/// Takes over the terminal until the user quits.
///
/// Raw mode and the alternate screen are restored even when the loop fails.
pub fn run_tui(catalog: Catalog) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    info!(products = catalog.products().len(), "starting terminal ui");
    let mut app = App::new(catalog);
    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    while !app.should_quit() {
        terminal.draw(|f| ui(f, app))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                app.handle_key(key);
            }
        }
        app.catalog.status.tick();
    }
    info!("terminal ui closed");
    Ok(())
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

// Column after `text` inside a bordered block, kept on the block's inner edge.
fn cursor_x(area: Rect, label_width: u16, text: &str) -> u16 {
    let inner_right = area.right().saturating_sub(2).max(area.x);
    area.x
        .saturating_add(1)
        .saturating_add(label_width)
        .saturating_add(utils::display_width(text))
        .min(inner_right)
}

fn notice_style(notice: &Notice) -> Style {
    match notice.tone {
        Tone::Success => Style::default().fg(Color::Green),
        Tone::Error => Style::default().fg(Color::Red),
    }
}

fn label_style(active: bool) -> Style {
    if active {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default().add_modifier(Modifier::BOLD)
    }
}

pub fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(4),
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(f.size());

    // Register form
    let focused = match app.input_mode {
        InputMode::Form(field) => Some(field),
        _ => None,
    };
    let form = &app.catalog.form;
    let form_lines = vec![
        Line::from(vec![
            Span::styled("Name:  ", label_style(focused == Some(FormField::Name))),
            Span::raw(form.name.clone()),
        ]),
        Line::from(vec![
            Span::styled("Price: ", label_style(focused == Some(FormField::Price))),
            Span::raw(form.price.clone()),
        ]),
    ];
    let form_block = Block::default()
        .borders(Borders::ALL)
        .title(" Register a New Product ");
    f.render_widget(Paragraph::new(form_lines).block(form_block), chunks[0]);

    if let Some(field) = focused {
        let (row, text) = match field {
            FormField::Name => (0, &form.name),
            FormField::Price => (1, &form.price),
        };
        f.set_cursor(
            cursor_x(chunks[0], FORM_LABEL_WIDTH, text),
            chunks[0].y + 1 + row,
        );
    }

    // Status line
    if let Some(notice) = app.catalog.status.visible() {
        let status = Paragraph::new(notice.text.as_str())
            .style(notice_style(notice))
            .alignment(Alignment::Center);
        f.render_widget(status, chunks[1]);
    }

    // Product table
    let rows: Vec<Row> = app
        .catalog
        .products()
        .iter()
        .map(|p| Row::new(vec![p.name.clone(), p.price.clone()]))
        .collect();
    let header = Row::new(vec!["Name", "Price"])
        .style(Style::default().add_modifier(Modifier::BOLD));
    let table = Table::new(rows, [Constraint::Percentage(50), Constraint::Percentage(50)])
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" Products ({}) ", app.catalog.products().len())),
        )
        .highlight_style(
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol(">> ");
    f.render_stateful_widget(table, chunks[2], &mut app.state);

    let help_text = match app.input_mode {
        InputMode::Browse => "j/k: Nav | a/Tab: Add | e/Enter: Edit | d: Delete | r: Refresh | q: Quit",
        InputMode::Form(_) => "Tab: Next Field | Enter: Save Product | Esc: Back | Backspace: Delete",
        InputMode::Editing => "Tab: Next Field | Enter: Save New Product | Esc: Cancel",
    };
    let help = Paragraph::new(help_text).block(Block::default().borders(Borders::ALL).title(" Help "));
    f.render_widget(help, chunks[3]);

    if let Some(dialog) = &app.dialog {
        render_dialog(f, dialog, app.catalog.status.visible());
    }
}

fn render_dialog(f: &mut Frame, dialog: &EditDialog, notice: Option<&Notice>) {
    let area = centered_rect(60, 50, f.size());
    let current = dialog.current();
    let readonly = Style::default().fg(Color::DarkGray);
    let field_line = |label: &'static str, value: &str, active: bool| {
        Line::from(vec![
            Span::styled(label, label_style(active)),
            Span::raw(value.to_string()),
        ])
    };

    let mut lines = vec![
        Line::from(vec![
            Span::styled("Current Name:  ", label_style(false)),
            Span::styled(current.name.clone(), readonly),
        ]),
        field_line("New Name:      ", &dialog.new_name, dialog.focus == EditField::NewName),
        Line::from(vec![
            Span::styled("Current Price: ", label_style(false)),
            Span::styled(current.price.clone(), readonly),
        ]),
        field_line("New Price:     ", &dialog.new_price, dialog.focus == EditField::NewPrice),
        Line::from(""),
        Line::from(Span::styled(
            "[Enter] Save New Product  [Esc] Cancel",
            Style::default().fg(Color::DarkGray),
        )),
    ];
    if let Some(notice) = notice.filter(|n| n.tone == Tone::Error) {
        lines.push(Line::from(Span::styled(notice.text.clone(), notice_style(notice))));
    }

    let block = Block::default()
        .title(" Product Edition ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    f.render_widget(Clear, area);
    f.render_widget(Paragraph::new(lines).block(block), area);

    let (row, text) = match dialog.focus {
        EditField::NewName => (1, &dialog.new_name),
        EditField::NewPrice => (3, &dialog.new_price),
    };
    f.set_cursor(cursor_x(area, DIALOG_LABEL_WIDTH, text), area.y + 1 + row);
}
