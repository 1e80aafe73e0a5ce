use std::time::Duration;

use anyhow::Result;
use crossterm::{event::{self, Event, KeyCode, KeyEventKind}, execute, terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen}};
use ratatui::{backend::CrosstermBackend, Frame, Terminal, widgets::{Block, Borders, List, ListItem, Paragraph, ListState, Wrap}, layout::{Layout, Constraint, Direction}, style::{Style, Modifier, Color}};

use todo_mcp::{application::todo_service::{TodoService, TodoServiceImpl}, domain::todo::{CreateTodo, Todo, TodoStatus, UpdateTodo}, infrastructure::memory_repo::InMemoryTodoRepository};

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    let service = TodoServiceImpl::new(InMemoryTodoRepository::new());

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let res = run_app(&mut terminal, App::new(service)).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mode { View, Create, Edit }

#[derive(Clone, Copy, PartialEq, Eq)]
enum ActiveField { Title, Description }

impl ActiveField {
    fn toggle(self) -> Self {
        match self { ActiveField::Title => ActiveField::Description, ActiveField::Description => ActiveField::Title }
    }
}

struct App<S: TodoService> {
    service: S,
    todos: Vec<Todo>,
    // None shows everything
    filter: Option<TodoStatus>,
    visible: Vec<usize>,
    list_state: ListState,
    mode: Mode,
    field: ActiveField,
    draft_title: String,
    draft_desc: String,
    notice: Option<String>,
}

impl<S: TodoService> App<S> {
    fn new(service: S) -> Self {
        Self {
            service,
            todos: Vec::new(),
            filter: None,
            visible: Vec::new(),
            list_state: ListState::default(),
            mode: Mode::View,
            field: ActiveField::Title,
            draft_title: String::new(),
            draft_desc: String::new(),
            notice: None,
        }
    }

    async fn reload(&mut self) -> Result<()> {
        self.todos = self.service.list().await?;
        self.visible = self.todos.iter().enumerate()
            .filter(|(_, t)| self.filter.is_none_or(|f| t.status == f))
            .map(|(i, _)| i)
            .collect();
        let selected = match (self.visible.len(), self.list_state.selected()) {
            (0, _) => None,
            (len, Some(i)) => Some(i.min(len - 1)),
            (_, None) => Some(0),
        };
        self.list_state.select(selected);
        Ok(())
    }

    fn selected(&self) -> Option<&Todo> {
        self.list_state.selected().and_then(|i| self.visible.get(i)).and_then(|&idx| self.todos.get(idx))
    }

    fn move_selection(&mut self, down: bool) {
        let Some(i) = self.list_state.selected() else { return };
        let next = if down { (i + 1).min(self.visible.len().saturating_sub(1)) } else { i.saturating_sub(1) };
        self.list_state.select(Some(next));
    }

    fn start_draft(&mut self, mode: Mode) {
        let (title, desc) = match (mode, self.selected()) {
            (Mode::Edit, Some(t)) => (t.title.clone(), t.description.clone()),
            (Mode::Edit, None) => return,
            _ => (String::new(), String::new()),
        };
        self.mode = mode;
        self.field = ActiveField::Title;
        self.draft_title = title;
        self.draft_desc = desc;
    }

    fn cancel_draft(&mut self) {
        self.mode = Mode::View;
        self.draft_title.clear();
        self.draft_desc.clear();
    }

    fn draft_mut(&mut self) -> &mut String {
        match self.field { ActiveField::Title => &mut self.draft_title, ActiveField::Description => &mut self.draft_desc }
    }

    async fn save_draft(&mut self) {
        let title = self.draft_title.trim().to_string();
        let description = self.draft_desc.trim().to_string();
        let outcome = match self.mode {
            Mode::Create => self.service
                .create(CreateTodo { title, description: Some(description), status: None })
                .await
                .map(|t| format!("created #{}", t.id)),
            Mode::Edit => match self.selected().map(|t| t.id) {
                Some(id) => self.service
                    .update(id, UpdateTodo { title: Some(title), description: Some(description), status: None })
                    .await
                    .map(|t| format!("updated #{}", t.id)),
                None => return self.cancel_draft(),
            },
            Mode::View => return,
        };
        match outcome {
            Ok(msg) => { self.notice = Some(msg); self.cancel_draft(); }
            // keep the draft open so the user can fix it
            Err(e) => self.notice = Some(e.to_string()),
        }
    }

    async fn cycle_status(&mut self) {
        let Some((id, status)) = self.selected().map(|t| (t.id, t.status.cycle())) else { return };
        let res = self.service.update(id, UpdateTodo { status: Some(status), ..Default::default() }).await;
        self.notice = Some(match res { Ok(t) => format!("#{} is now {}", t.id, t.status), Err(e) => e.to_string() });
    }

    async fn delete_selected(&mut self) {
        let Some(id) = self.selected().map(|t| t.id) else { return };
        self.notice = Some(match self.service.delete(id).await { Ok(_) => format!("deleted #{id}"), Err(e) => e.to_string() });
    }

    fn next_filter(&mut self) {
        self.filter = match self.filter {
            None => Some(TodoStatus::Pending),
            Some(TodoStatus::Completed) => None,
            Some(s) => Some(s.cycle()),
        };
        self.list_state.select(Some(0));
    }
}

fn status_mark(status: TodoStatus) -> &'static str {
    match status { TodoStatus::Pending => "[ ]", TodoStatus::InProgress => "[~]", TodoStatus::Completed => "[x]" }
}

fn draw<S: TodoService>(f: &mut Frame, app: &mut App<S>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(1), Constraint::Length(3)])
        .split(f.size());

    let header = Paragraph::new("Enter: next status, n: new, e: edit, d: delete, f: filter, q: quit  |  Tab switches field, Esc cancels")
        .block(Block::default().borders(Borders::ALL).title("todo-mcp"));
    f.render_widget(header, chunks[0]);

    let middle = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(chunks[1]);

    let items: Vec<ListItem> = app.visible.iter()
        .filter_map(|&idx| app.todos.get(idx))
        .map(|t| ListItem::new(format!("{} #{} {}", status_mark(t.status), t.id, t.title)))
        .collect();
    let filter_label = app.filter.map_or("all", |s| s.as_str());
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(format!("todos [{filter_label}]")))
        .highlight_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD | Modifier::REVERSED))
        .highlight_symbol(">> ");
    f.render_stateful_widget(list, middle[0], &mut app.list_state);

    let detail = app.selected().map(|t| {
        let desc = if t.description.is_empty() { "(no description)" } else { t.description.as_str() };
        format!(
            "Title:\n{}\n\nStatus: {}\n\nDescription:\n{}\n\nCreated: {}\nUpdated: {}",
            t.title, t.status, desc,
            t.created_at.format("%Y-%m-%d %H:%M"), t.updated_at.format("%Y-%m-%d %H:%M"),
        )
    }).unwrap_or_default();
    let details = Paragraph::new(detail)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title("details"));
    f.render_widget(details, middle[1]);

    let (title, text) = match app.mode {
        Mode::View => ("info", app.notice.clone().unwrap_or_else(|| format!("{} todos", app.todos.len()))),
        Mode::Create | Mode::Edit => {
            let label = match app.field { ActiveField::Title => "Title", ActiveField::Description => "Desc" };
            let value = match app.field { ActiveField::Title => &app.draft_title, ActiveField::Description => &app.draft_desc };
            let notice = app.notice.as_deref().map(|n| format!("  |  {n}")).unwrap_or_default();
            (if app.mode == Mode::Create { "create" } else { "edit" }, format!("{label}: {value}_{notice}"))
        }
    };
    f.render_widget(Paragraph::new(text).block(Block::default().borders(Borders::ALL).title(title)), chunks[2]);
}

async fn run_app<S: TodoService>(terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>, mut app: App<S>) -> Result<()> {
    let tick_rate = Duration::from_millis(200);
    app.reload().await?;

    loop {
        terminal.draw(|f| draw(f, &mut app))?;

        if !event::poll(tick_rate)? { continue; }
        let Event::Key(key) = event::read()? else { continue };
        // Only act on key presses; repeats and releases would duplicate input
        if key.kind != KeyEventKind::Press { continue; }

        match app.mode {
            Mode::View => match key.code {
                KeyCode::Char('q') => break,
                KeyCode::Up => app.move_selection(false),
                KeyCode::Down => app.move_selection(true),
                KeyCode::Enter => app.cycle_status().await,
                KeyCode::Char('n') => { app.notice = None; app.start_draft(Mode::Create) }
                KeyCode::Char('e') => { app.notice = None; app.start_draft(Mode::Edit) }
                KeyCode::Char('d') => app.delete_selected().await,
                KeyCode::Char('f') => app.next_filter(),
                _ => {}
            },
            Mode::Create | Mode::Edit => match key.code {
                KeyCode::Esc => app.cancel_draft(),
                KeyCode::Enter => app.save_draft().await,
                KeyCode::Tab => app.field = app.field.toggle(),
                KeyCode::Backspace => { app.draft_mut().pop(); }
                KeyCode::Char(c) => app.draft_mut().push(c),
                _ => {}
            },
        }
        app.reload().await?;
    }
    Ok(())
}
