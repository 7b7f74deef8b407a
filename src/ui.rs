use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{
        Block, Borders, Clear, List, ListItem, Paragraph, Scrollbar, ScrollbarOrientation,
        ScrollbarState, Wrap,
    },
};

use crate::app::{App, InputMode, Screen, ToastKind};
use crate::responder::Action;
use crate::session::{ChatRole, Document, Phase};

/// Style `**bold**` segments the way the canned replies use them.
/// Segments split on the marker alternate plain/bold; the replies always
/// balance their markers.
fn styled_line(text: &str) -> Line<'static> {
    let mut spans: Vec<Span<'static>> = Vec::new();
    for (i, segment) in text.split("**").enumerate() {
        if segment.is_empty() {
            continue;
        }
        if i % 2 == 1 {
            spans.push(Span::styled(
                segment.to_string(),
                Style::default().add_modifier(Modifier::BOLD),
            ));
        } else {
            spans.push(Span::raw(segment.to_string()));
        }
    }
    Line::from(spans)
}

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    // Main layout: header, body, footer
    let [header_area, body_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(app, frame, header_area);

    match app.screen {
        Screen::Landing => render_landing_screen(app, frame, body_area),
        Screen::Chat => render_chat_screen(app, frame, body_area),
    }

    render_footer(app, frame, footer_area);

    render_toast(app, frame, area);
}

fn render_header(app: &App, frame: &mut Frame, area: Rect) {
    let document_indicator = match &app.session.document {
        Some(document) => format!(" [{}]", document.name),
        None => String::new(),
    };

    let title = Line::from(vec![
        Span::styled(
            " Tell Me Everything ",
            Style::default().fg(Color::Cyan).bold(),
        ),
        Span::styled(document_indicator, Style::default().fg(Color::DarkGray)),
        Span::raw(" "),
        Span::styled(
            format!("v{}", env!("CARGO_PKG_VERSION")),
            Style::default().fg(Color::DarkGray),
        ),
    ]);

    let header = Paragraph::new(title).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(header, area);
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    let mode_style = match app.input_mode {
        InputMode::Normal => Style::default().bg(Color::Blue).fg(Color::White),
        InputMode::Editing => Style::default().bg(Color::Yellow).fg(Color::Black),
    };

    let mode_text = match app.screen {
        Screen::Landing => " HOME ",
        Screen::Chat => " CHAT ",
    };

    let key_style = Style::default().bg(Color::DarkGray).fg(Color::White);
    let label_style = Style::default().bg(Color::Black).fg(Color::White);

    let hints: Vec<Span> = match (app.screen, app.input_mode) {
        (Screen::Landing, _) => vec![
            Span::styled(" c ", key_style),
            Span::styled(" open chat ", label_style),
            Span::styled(" j/k ", key_style),
            Span::styled(" scroll ", label_style),
            Span::styled(" a/f/t ", key_style),
            Span::styled(" sections ", label_style),
            Span::styled(" q ", key_style),
            Span::styled(" quit ", label_style),
        ],
        (Screen::Chat, InputMode::Normal) => {
            let mut hints = match app.session.phase() {
                Phase::Empty => vec![
                    Span::styled(" o ", key_style),
                    Span::styled(" choose file ", label_style),
                ],
                Phase::ActionMenu => vec![
                    Span::styled(" j/k ", key_style),
                    Span::styled(" menu ", label_style),
                    Span::styled(" Enter ", key_style),
                    Span::styled(" run ", label_style),
                    Span::styled(" m ", key_style),
                    Span::styled(" pin menu ", label_style),
                ],
                Phase::FreeForm => vec![
                    Span::styled(" i ", key_style),
                    Span::styled(" compose ", label_style),
                    Span::styled(" j/k ", key_style),
                    Span::styled(" scroll ", label_style),
                ],
            };
            if app.session.document.is_some() {
                hints.extend(vec![
                    Span::styled(" r ", key_style),
                    Span::styled(" new analysis ", label_style),
                ]);
            }
            hints.extend(vec![
                Span::styled(" Esc ", key_style),
                Span::styled(" home ", label_style),
                Span::styled(" q ", key_style),
                Span::styled(" quit ", label_style),
            ]);
            hints
        }
        (Screen::Chat, InputMode::Editing) => {
            let submit_label = if app.session.document.is_none() {
                " upload "
            } else {
                " send "
            };
            vec![
                Span::styled(" Enter ", key_style),
                Span::styled(submit_label, label_style),
                Span::styled(" Esc ", key_style),
                Span::styled(" stop typing ", label_style),
            ]
        }
    };

    let footer_content = Line::from(
        vec![
            Span::styled(mode_text, mode_style),
            Span::styled(" ", label_style),
        ]
        .into_iter()
        .chain(hints)
        .collect::<Vec<_>>(),
    );

    let footer = Paragraph::new(footer_content).style(Style::default().bg(Color::Black));
    frame.render_widget(footer, area);
}

fn render_landing_screen(app: &mut App, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    let inner_area = block.inner(area);
    app.landing_height = inner_area.height;

    let heading = Style::default().fg(Color::Cyan).bold();
    let section = Style::default().fg(Color::Yellow).bold();
    let dim = Style::default().fg(Color::DarkGray);
    let quote = Style::default().add_modifier(Modifier::ITALIC);

    let mut lines: Vec<Line> = vec![
        Line::default(),
        Line::from(Span::styled("  TELL ME EVERYTHING", heading)),
        Line::from(Span::styled(
            "  AI-Powered Document Analysis",
            Style::default().fg(Color::Magenta),
        )),
        Line::default(),
        Line::from("  Instantly summarize your chats and documents. Save time, stay"),
        Line::from("  informed, and never miss important details again."),
        Line::default(),
        Line::from(vec![
            Span::raw("  Press "),
            Span::styled("c", section),
            Span::raw(" to start analyzing, or "),
            Span::styled("f", section),
            Span::raw(" to explore the features."),
        ]),
        Line::default(),
    ];

    // About
    app.landing_offsets[0] = lines.len() as u16;
    lines.extend(vec![
        Line::from(Span::styled("  ── About ──", section)),
        Line::default(),
        Line::from("  Stop drowning in information overload. Group chats move fast,"),
        Line::from("  important documents pile up, and critical information gets buried"),
        Line::from("  in endless conversations. Tell Me Everything cuts through the"),
        Line::from("  noise, giving you instant insights and summaries so you can focus"),
        Line::from("  on what matters most."),
        Line::default(),
        Line::from("  • Group Chat Chaos: hundreds of messages, mixed conversations,"),
        Line::from("    important updates lost in the stream"),
        Line::from("  • Time Wasted: hours spent scrolling through conversations to"),
        Line::from("    find key information"),
        Line::from("  • AI Solution: intelligent analysis that extracts and summarizes"),
        Line::from("    what you need to know"),
        Line::default(),
    ]);

    // Features
    app.landing_offsets[1] = lines.len() as u16;
    lines.extend(vec![
        Line::from(Span::styled("  ── Features ──", section)),
        Line::default(),
        Line::from("  Transform your documents and conversations into actionable"),
        Line::from("  insights:"),
        Line::default(),
        Line::from("  • WhatsApp Chat Summarization: export your conversations and get"),
        Line::from("    instant summaries of key discussions and decisions"),
        Line::from("  • Document Analysis: upload PDFs and text files to extract key"),
        Line::from("    information instantly"),
        Line::from("  • AI Safety Checks: scan files for potential security risks"),
        Line::from("    before opening or sharing them"),
        Line::from("  • Time Efficiency: get insights in seconds, not hours"),
        Line::default(),
    ]);

    // Testimonials
    app.landing_offsets[2] = lines.len() as u16;
    lines.extend(vec![
        Line::from(Span::styled("  ── What our users say ──", section)),
        Line::default(),
        Line::from(Span::styled(
            "  \"Tell Me Everything saved me hours every week. No more scrolling",
            quote,
        )),
        Line::from(Span::styled(
            "  through endless WhatsApp groups to find important updates!\"",
            quote,
        )),
        Line::from(Span::styled(
            "      Sarah Johnson, Project Manager",
            dim,
        )),
        Line::default(),
        Line::from(Span::styled(
            "  \"The AI safety checks give me peace of mind when dealing with",
            quote,
        )),
        Line::from(Span::styled(
            "  client documents. Incredibly useful feature.\"",
            quote,
        )),
        Line::from(Span::styled(
            "      Michael Chen, Legal Consultant",
            dim,
        )),
        Line::default(),
        Line::from(Span::styled(
            "  \"Game-changer for our team communications. We can finally keep",
            quote,
        )),
        Line::from(Span::styled(
            "  track of what's happening without information overload.\"",
            quote,
        )),
        Line::from(Span::styled(
            "      Emily Rodriguez, Team Lead",
            dim,
        )),
        Line::default(),
        Line::from(Span::styled(
            "  Tell Me Everything · contact@tellmeeverything.ai",
            dim,
        )),
        Line::default(),
    ]);

    app.landing_total_lines = lines.len() as u16;
    let max_scroll = app
        .landing_total_lines
        .saturating_sub(app.landing_height);
    app.landing_scroll = app.landing_scroll.min(max_scroll);

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((app.landing_scroll, 0));

    frame.render_widget(paragraph, area);

    if app.landing_total_lines > app.landing_height {
        let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
            .begin_symbol(Some("^"))
            .end_symbol(Some("v"));

        let mut scrollbar_state = ScrollbarState::new(app.landing_total_lines as usize)
            .position(app.landing_scroll as usize);

        frame.render_stateful_widget(
            scrollbar,
            area.inner(ratatui::layout::Margin {
                vertical: 1,
                horizontal: 0,
            }),
            &mut scrollbar_state,
        );
    }
}

fn render_chat_screen(app: &mut App, frame: &mut Frame, area: Rect) {
    if app.session.document.is_none() {
        render_upload_prompt(app, frame, area);
        return;
    }

    // Document card on top, then the menu when it is visible, the log,
    // and the free-form input at the bottom
    let mut constraints = vec![Constraint::Length(4)];
    if app.session.menu_visible {
        constraints.push(Constraint::Length(Action::MENU.len() as u16 + 2));
    }
    constraints.push(Constraint::Min(0));
    if app.session.free_form {
        constraints.push(Constraint::Length(3));
    }

    let chunks = Layout::vertical(constraints).split(area);
    let mut next = 0;

    let card_area = chunks[next];
    next += 1;
    if let Some(document) = app.session.document.clone() {
        render_document_card(&document, frame, card_area);
    }

    if app.session.menu_visible {
        render_action_menu(app, frame, chunks[next]);
        next += 1;
    }

    render_message_log(app, frame, chunks[next]);

    if app.session.free_form {
        render_draft_input(app, frame, chunks[next + 1]);
    }
}

fn render_upload_prompt(app: &mut App, frame: &mut Frame, area: Rect) {
    let editing = app.input_mode == InputMode::Editing;

    let chunks = if editing {
        Layout::vertical([Constraint::Min(0), Constraint::Length(3)]).split(area)
    } else {
        Layout::vertical([Constraint::Min(0)]).split(area)
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Document Chat ");

    let key = Style::default().fg(Color::Yellow).bold();
    let text = Text::from(vec![
        Line::default(),
        Line::from(Span::styled(
            "Upload Your Document",
            Style::default().bold(),
        )),
        Line::default(),
        Line::from("Upload a WhatsApp chat export, PDF, or text file"),
        Line::from("to get started with AI analysis."),
        Line::default(),
        Line::from(vec![
            Span::raw("Press "),
            Span::styled("o", key),
            Span::raw(" to choose a file."),
        ]),
        Line::default(),
        Line::from(Span::styled(
            "Supported formats: .txt, .pdf",
            Style::default().fg(Color::DarkGray),
        )),
    ]);

    let prompt = Paragraph::new(text)
        .alignment(Alignment::Center)
        .block(block);
    frame.render_widget(prompt, chunks[0]);

    if editing {
        let input_block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow))
            .title(" File path ");

        let input = Paragraph::new(app.path_input.as_str())
            .style(Style::default().fg(Color::Cyan))
            .block(input_block);

        frame.render_widget(input, chunks[1]);
        frame.set_cursor_position((
            chunks[1].x + app.path_input.chars().count() as u16 + 1,
            chunks[1].y + 1,
        ));
    }
}

fn render_document_card(document: &Document, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Document ");

    let card = Paragraph::new(vec![
        Line::from(vec![
            Span::raw(" 📄 "),
            Span::styled(document.name.clone(), Style::default().bold()),
        ]),
        Line::from(vec![
            Span::styled(
                format!(
                    "    {} · {} · ",
                    document.extension.to_uppercase(),
                    document.size_display()
                ),
                Style::default().fg(Color::DarkGray),
            ),
            Span::styled("● Ready for analysis", Style::default().fg(Color::Green)),
        ]),
    ])
    .block(block);

    frame.render_widget(card, area);
}

fn render_action_menu(app: &mut App, frame: &mut Frame, area: Rect) {
    // Dimmed while a response is pending; the guard lives in the session,
    // the color just matches it
    let border_color = if app.session.awaiting_response {
        Color::DarkGray
    } else {
        Color::Cyan
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(" What would you like me to do? ");

    let items: Vec<ListItem> = Action::MENU
        .iter()
        .map(|action| {
            ListItem::new(Line::from(vec![
                Span::styled(format!(" {:<18}", action.label()), Style::default().bold()),
                Span::styled(action.description(), Style::default().fg(Color::DarkGray)),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    frame.render_stateful_widget(list, area, &mut app.menu_state);
}

fn render_message_log(app: &mut App, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Conversation ");

    let inner_area = block.inner(area);
    app.chat_height = inner_area.height;
    app.chat_width = inner_area.width;

    let mut lines: Vec<Line> = Vec::new();
    for message in app.session.messages() {
        let stamp = message.timestamp.format("%H:%M:%S");
        match message.role {
            ChatRole::User => {
                lines.push(Line::from(Span::styled(
                    format!("You · {}", stamp),
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                )));
                lines.push(Line::from(message.content.clone()));
            }
            ChatRole::Assistant => {
                lines.push(Line::from(Span::styled(
                    format!("AI · {}", stamp),
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                )));
                for line in message.content.lines() {
                    lines.push(styled_line(line));
                }
            }
        }
        lines.push(Line::default());
    }

    if app.session.awaiting_response {
        lines.push(Line::from(Span::styled(
            "AI:",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )));
        let dots = ".".repeat((app.animation_frame as usize) + 1);
        lines.push(Line::from(Span::styled(
            format!("Analyzing{}", dots),
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        )));
    }

    let total_lines = lines.len() as u16;
    app.chat_scroll = app
        .chat_scroll
        .min(total_lines.saturating_sub(app.chat_height));

    let log = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: true })
        .scroll((app.chat_scroll, 0));

    frame.render_widget(log, area);

    if total_lines > app.chat_height {
        let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
            .begin_symbol(Some("^"))
            .end_symbol(Some("v"));

        let mut scrollbar_state =
            ScrollbarState::new(total_lines as usize).position(app.chat_scroll as usize);

        frame.render_stateful_widget(
            scrollbar,
            area.inner(ratatui::layout::Margin {
                vertical: 1,
                horizontal: 0,
            }),
            &mut scrollbar_state,
        );
    }
}

fn render_draft_input(app: &mut App, frame: &mut Frame, area: Rect) {
    let editing = app.input_mode == InputMode::Editing;
    let border_color = if editing { Color::Yellow } else { Color::DarkGray };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(" Ask about this document ");

    let input = if app.session.draft.is_empty() && !editing {
        Paragraph::new("Ask me anything about this document...")
            .style(Style::default().fg(Color::DarkGray))
            .block(block)
    } else {
        Paragraph::new(app.session.draft.as_str())
            .style(Style::default().fg(Color::Cyan))
            .block(block)
    };

    frame.render_widget(input, area);

    if editing {
        frame.set_cursor_position((area.x + app.draft_cursor as u16 + 1, area.y + 1));
    }
}

fn render_toast(app: &App, frame: &mut Frame, area: Rect) {
    let Some(toast) = &app.toast else {
        return;
    };

    let (color, title) = match toast.kind {
        ToastKind::Info => (Color::Green, " ✓ "),
        ToastKind::Error => (Color::Red, " ! "),
    };

    let width = (toast.text.chars().count() as u16 + 4).min(area.width.saturating_sub(4));
    let rect = Rect {
        x: area.width.saturating_sub(width + 2),
        y: area.height.saturating_sub(5),
        width,
        height: 3,
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color))
        .title(title);

    frame.render_widget(Clear, rect);
    frame.render_widget(
        Paragraph::new(toast.text.as_str())
            .wrap(Wrap { trim: true })
            .block(block),
        rect,
    );
}
