use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use crate::app::{AddField, App, AuthField, EditField, Feedback, FeedbackKind, Screen};
use crate::session::Theme;
use crate::task::{Prioridade, Task};

struct Palette {
    fg: Color,
    dim: Color,
    accent: Color,
    done: Color,
}

fn palette(theme: Theme) -> Palette {
    match theme {
        Theme::Light => Palette {
            fg: Color::Black,
            dim: Color::DarkGray,
            accent: Color::Blue,
            done: Color::DarkGray,
        },
        Theme::Dark => Palette {
            fg: Color::White,
            dim: Color::Gray,
            accent: Color::Cyan,
            done: Color::DarkGray,
        },
    }
}

fn priority_color(prioridade: Option<Prioridade>) -> Color {
    match prioridade {
        Some(Prioridade::Vermelha) => Color::Red,
        Some(Prioridade::Amarela) => Color::Yellow,
        Some(Prioridade::Verde) => Color::Green,
        None => Color::DarkGray,
    }
}

fn feedback_line(feedback: &Option<Feedback>) -> Line<'_> {
    match feedback {
        Some(f) => {
            let color = match f.kind {
                FeedbackKind::Info => Color::Green,
                FeedbackKind::Error => Color::Red,
            };
            Line::from(Span::styled(f.text.as_str(), Style::default().fg(color)))
        }
        None => Line::from(""),
    }
}

pub fn draw(frame: &mut Frame, app: &App) {
    match app.screen {
        Screen::Login => draw_auth_screen(frame, app, " Login "),
        Screen::Register => draw_auth_screen(frame, app, " Registrar "),
        Screen::Tasks => draw_tasks_screen(frame, app),
    }
}

fn draw_auth_screen(frame: &mut Frame, app: &App, title: &str) {
    let colors = palette(app.session.theme);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(2)
        .constraints([
            Constraint::Percentage(30),
            Constraint::Length(8),
            Constraint::Min(0),
        ])
        .split(frame.area());

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors.accent));
    let inner = block.inner(chunks[1]);
    frame.render_widget(block, chunks[1]);

    let fields = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(inner);

    let focused = Style::default().fg(colors.accent).add_modifier(Modifier::BOLD);
    let blurred = Style::default().fg(colors.fg);

    let email = Paragraph::new(format!("Email: {}", app.auth_email)).style(
        if app.auth_field == AuthField::Email {
            focused
        } else {
            blurred
        },
    );
    frame.render_widget(email, fields[0]);

    let password = Paragraph::new(format!("Senha: {}", "*".repeat(app.auth_password.len())))
        .style(if app.auth_field == AuthField::Password {
            focused
        } else {
            blurred
        });
    frame.render_widget(password, fields[1]);

    frame.render_widget(Paragraph::new(feedback_line(&app.auth_message)), fields[2]);

    let hint = match app.screen {
        Screen::Register => "Tab: campo | Enter: registrar | Esc: voltar ao login",
        _ => "Tab: campo | Enter: entrar | Ctrl+R: registrar | Esc: sair",
    };
    let instructions = Paragraph::new(hint)
        .style(Style::default().fg(colors.dim))
        .alignment(Alignment::Center);
    frame.render_widget(instructions, chunks[2]);
}

fn draw_tasks_screen(frame: &mut Frame, app: &App) {
    let colors = palette(app.session.theme);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(5),
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(frame.area());

    let header = Line::from(vec![
        Span::styled(" Minhas Tarefas ", Style::default().fg(colors.accent).add_modifier(Modifier::BOLD)),
        Span::styled(
            format!(
                "| filtro: {} | ordem: {} ",
                app.filter.label(),
                app.sort.label()
            ),
            Style::default().fg(colors.fg),
        ),
    ]);
    frame.render_widget(Paragraph::new(header), chunks[0]);

    draw_add_form(frame, app, &colors, chunks[1]);
    draw_task_list(frame, app, &colors, chunks[2]);

    frame.render_widget(Paragraph::new(feedback_line(&app.task_message)), chunks[3]);

    let hint = if app.editing.is_some() {
        "Tab: campo | Enter: salvar | Esc: cancelar edição"
    } else if app.adding {
        "Tab: campo | Ctrl+P: prioridade | Enter: adicionar | Esc: cancelar"
    } else {
        "a: adicionar | c: concluir | e: editar | d: deletar | f: filtro | o: ordem | t: tema | l: sair | q: fechar"
    };
    let footer = Paragraph::new(hint).style(Style::default().fg(colors.dim));
    frame.render_widget(footer, chunks[4]);
}

fn draw_add_form(
    frame: &mut Frame,
    app: &App,
    colors: &Palette,
    area: ratatui::layout::Rect,
) {
    let block = Block::default()
        .title(" Nova tarefa ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors.dim));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(inner);

    let focused = Style::default().fg(colors.accent).add_modifier(Modifier::BOLD);
    let blurred = Style::default().fg(colors.fg);
    let style_for = |field: AddField| {
        if app.adding && app.add_field == field {
            focused
        } else {
            blurred
        }
    };

    frame.render_widget(
        Paragraph::new(format!("Título: {}", app.add_titulo)).style(style_for(AddField::Titulo)),
        rows[0],
    );
    frame.render_widget(
        Paragraph::new(format!("Descrição: {}", app.add_descricao))
            .style(style_for(AddField::Descricao)),
        rows[1],
    );
    let prioridade = app
        .add_prioridade
        .map(Prioridade::label)
        .unwrap_or("nenhuma");
    let date_row = Line::from(vec![
        Span::styled(
            format!("Vencimento (AAAA-MM-DD): {}", app.add_data),
            style_for(AddField::DataVencimento),
        ),
        Span::styled(
            format!("  prioridade: {prioridade}"),
            Style::default().fg(priority_color(app.add_prioridade)),
        ),
    ]);
    frame.render_widget(Paragraph::new(date_row), rows[2]);
}

fn draw_task_list(
    frame: &mut Frame,
    app: &App,
    colors: &Palette,
    area: ratatui::layout::Rect,
) {
    let view = app.projected();

    let items: Vec<ListItem> = if view.is_empty() {
        vec![ListItem::new(Span::styled(
            "Nenhuma tarefa encontrada. Adicione uma!",
            Style::default().fg(colors.dim),
        ))]
    } else {
        view.iter()
            .enumerate()
            .map(|(i, task)| task_row(app, colors, i, *task))
            .collect()
    };

    let list = List::new(items).block(
        Block::default()
            .title(format!(" Tarefas ({}) ", view.len()))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(colors.accent)),
    );
    frame.render_widget(list, area);
}

fn task_row<'a>(app: &'a App, colors: &Palette, index: usize, task: &'a Task) -> ListItem<'a> {
    // A row in edit mode shows its input buffers instead of the record.
    if let Some(edit) = app.editing.as_ref().filter(|e| e.id == task.id) {
        let marker = |field: EditField| if edit.field == field { "█" } else { "" };
        return ListItem::new(Line::from(vec![
            Span::styled("✎ ", Style::default().fg(colors.accent)),
            Span::styled(
                format!("Título: {}{}", edit.titulo, marker(EditField::Titulo)),
                Style::default().fg(colors.accent),
            ),
            Span::styled(
                format!("  Descrição: {}{}", edit.descricao, marker(EditField::Descricao)),
                Style::default().fg(colors.accent),
            ),
        ]));
    }

    let selected = index == app.selected;
    let base = if task.concluida {
        Style::default()
            .fg(colors.done)
            .add_modifier(Modifier::CROSSED_OUT)
    } else {
        Style::default().fg(colors.fg)
    };
    let base = if selected {
        base.add_modifier(Modifier::BOLD | Modifier::REVERSED)
    } else {
        base
    };

    let mut spans = vec![
        Span::styled(
            if task.concluida { "[x] " } else { "[ ] " },
            base,
        ),
        Span::styled("● ", Style::default().fg(priority_color(task.prioridade))),
        Span::styled(task.titulo.as_str(), base.add_modifier(Modifier::BOLD)),
    ];
    // Empty description renders as an empty stretch, never a placeholder word.
    spans.push(Span::styled(format!(" {}", task.descricao), base));
    if let Some(date) = task.data_vencimento {
        spans.push(Span::styled(
            format!(" (vence: {})", date.format("%d/%m/%Y")),
            Style::default().fg(colors.dim),
        ));
    }
    ListItem::new(Line::from(spans))
}
