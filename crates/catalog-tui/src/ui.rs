use crate::app::{App, InputMode};
use catalog_core::{ProductCard, StatusFilter, StockBadge};
use catalog_pipeline::{CatalogTransport, Phase};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
};

pub fn draw<T: CatalogTransport>(f: &mut Frame, app: &App<T>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header with stats
            Constraint::Length(3), // Search + filters
            Constraint::Min(0),    // Results
            Constraint::Length(3), // Footer
        ])
        .split(f.area());

    draw_header(f, app, chunks[0]);
    draw_controls(f, app, chunks[1]);
    draw_main(f, app, chunks[2]);
    draw_footer(f, app, chunks[3]);

    if app.input_mode == InputMode::ShowingHelp {
        draw_help(f);
    }
}

fn draw_header<T: CatalogTransport>(f: &mut Frame, app: &App<T>, area: Rect) {
    let stats = app.pipeline.stats();
    let business = &app.pipeline.options().contact.business_name;

    let line = Line::from(vec![
        Span::styled(
            format!("{} ", business),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::raw(" | "),
        Span::raw(format!("{} products", stats.total)),
        Span::raw(" | "),
        Span::styled(format!("{} in stock", stats.in_stock), Style::default().fg(Color::Green)),
        Span::raw(" | "),
        Span::styled(format!("{} low", stats.low_stock), Style::default().fg(Color::Yellow)),
        Span::raw(" | "),
        Span::raw(format!("{} categories", stats.categories_label())),
    ]);

    let header = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
    f.render_widget(header, area);
}

fn draw_controls<T: CatalogTransport>(f: &mut Frame, app: &App<T>, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);

    let filters = app.pipeline.filters();
    let searching = app.input_mode == InputMode::Searching;
    let search_text = if searching {
        format!("{}_", filters.search)
    } else {
        filters.search.clone()
    };
    let search_style = if searching {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let search = Paragraph::new(search_text)
        .style(search_style)
        .block(Block::default().borders(Borders::ALL).title(" Search "));
    f.render_widget(search, chunks[0]);

    let mut spans = Vec::new();
    for (i, status) in StatusFilter::ALL.into_iter().enumerate() {
        let label = format!("{}:{}", i + 1, status);
        let style = if status == filters.status {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        spans.push(Span::styled(label, style));
        spans.push(Span::raw(" "));
    }
    spans.push(Span::raw(" sort: "));
    spans.push(Span::styled(
        filters.sort.to_string(),
        Style::default().fg(Color::Yellow),
    ));

    let controls = Paragraph::new(Line::from(spans))
        .block(Block::default().borders(Borders::ALL).title(" Filter "));
    f.render_widget(controls, chunks[1]);
}

fn draw_main<T: CatalogTransport>(f: &mut Frame, app: &App<T>, area: Rect) {
    if app.is_loading() {
        let loading = Paragraph::new("Loading products...")
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(loading, area);
        return;
    }

    if app.phase() == Phase::Error {
        let reason = app.pipeline.last_error().unwrap_or("unknown error");
        let text = format!(
            "Failed to load products.\n\n{}\n\nPress r to retry.",
            reason
        );
        let error = Paragraph::new(text)
            .style(Style::default().fg(Color::Red))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL).title(" Error "));
        f.render_widget(error, area);
        return;
    }

    let view = app.pipeline.view();
    if view.is_empty() {
        let empty = Paragraph::new("No products found.\n\nPress x to reset filters.")
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!(" {} ", view.results_count())),
            );
        f.render_widget(empty, area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(55), // Card list
            Constraint::Percentage(45), // Details
        ])
        .split(area);

    let items: Vec<ListItem> = view.cards.iter().map(card_line).collect();
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ", view.results_count())),
        )
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        );
    let mut state = ListState::default().with_selected(Some(app.selected));
    f.render_stateful_widget(list, chunks[0], &mut state);

    draw_details(f, app.selected_card(), chunks[1]);
}

fn card_line(card: &ProductCard) -> ListItem<'_> {
    ListItem::new(Line::from(vec![
        Span::styled(
            format!("{:<12}", card.badge.label()),
            Style::default().fg(badge_color(card.badge)),
        ),
        Span::raw(" "),
        Span::styled(card.name.clone(), Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("  "),
        Span::styled(card.price_label.clone(), Style::default().fg(Color::Cyan)),
    ]))
}

fn badge_color(badge: StockBadge) -> Color {
    match badge {
        StockBadge::OutOfStock => Color::Red,
        StockBadge::LowStock => Color::Yellow,
        StockBadge::InStock => Color::Green,
    }
}

fn draw_details(f: &mut Frame, card: Option<&ProductCard>, area: Rect) {
    let Some(card) = card else {
        return;
    };

    let mut lines = vec![
        Line::from(Span::styled(
            card.name.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(format!("Part No: {}", card.part_number)),
        Line::from(""),
        Line::from(vec![
            Span::raw("Status:  "),
            Span::styled(card.badge.label(), Style::default().fg(badge_color(card.badge))),
        ]),
        Line::from(format!("Stock:   {}", card.stock_label)),
        Line::from(format!("Price:   {}", card.price_label)),
    ];
    if let Some(category) = &card.category {
        lines.push(Line::from(format!("Category: {}", category)));
    }
    if let Some(date) = &card.last_order {
        lines.push(Line::from(format!("Last order: {}", date)));
    }
    if let Some(image) = &card.image_url {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            image.clone(),
            Style::default().fg(Color::DarkGray),
        )));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "c: enquire on WhatsApp",
        Style::default().fg(Color::Green),
    )));

    let details = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title(" Details "));
    f.render_widget(details, area);
}

fn draw_footer<T: CatalogTransport>(f: &mut Frame, app: &App<T>, area: Rect) {
    let status = if let Some(msg) = &app.status_message {
        msg.clone()
    } else {
        "Ready".to_string()
    };

    let help_text = vec![
        Span::raw(status),
        Span::raw(" | "),
        Span::styled("q", Style::default().fg(Color::Yellow)),
        Span::raw(":quit "),
        Span::styled("/", Style::default().fg(Color::Yellow)),
        Span::raw(":search "),
        Span::styled("1-4", Style::default().fg(Color::Yellow)),
        Span::raw(":filter "),
        Span::styled("s", Style::default().fg(Color::Yellow)),
        Span::raw(":sort "),
        Span::styled("r", Style::default().fg(Color::Yellow)),
        Span::raw(":refresh "),
        Span::styled("?", Style::default().fg(Color::Yellow)),
        Span::raw(":help"),
    ];

    let footer = Paragraph::new(Line::from(help_text))
        .block(Block::default().borders(Borders::ALL));

    f.render_widget(footer, area);
}

fn draw_help(f: &mut Frame) {
    let area = centered(f.area(), 50, 60);
    let text = "j/k, up/down  move\n\
                /             search (enter keeps, esc clears)\n\
                1 2 3 4       all / in stock / out of stock / low stock\n\
                s             cycle sort\n\
                x             reset filters\n\
                c             show enquiry link\n\
                r             refresh catalog\n\
                q             quit";
    let help = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL).title(" Help "));
    f.render_widget(Clear, area);
    f.render_widget(help, area);
}

fn centered(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::{FixtureTransport, loaded_app};
    use ratatui::{Terminal, backend::TestBackend};

    fn screen<T: CatalogTransport>(app: &App<T>) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();
        terminal.draw(|f| draw(f, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[tokio::test]
    async fn test_draws_cards_and_counts() {
        let app = loaded_app(FixtureTransport::default()).await;
        let text = screen(&app);
        assert!(text.contains("Showing 3 of 3 products"));
        assert!(text.contains("Birch Ply"));
        assert!(text.contains("Contact for Price"));
        assert!(text.contains("Low Stock"));
    }

    #[tokio::test]
    async fn test_draws_error_view() {
        let app = loaded_app(FixtureTransport {
            fail: true,
            ..Default::default()
        })
        .await;
        let text = screen(&app);
        assert!(text.contains("Failed to load products."));
        assert!(text.contains("Press r to retry."));
    }

    #[tokio::test]
    async fn test_draws_no_results() {
        let mut app = loaded_app(FixtureTransport::default()).await;
        for c in "zzz".chars() {
            app.input_char(c);
        }
        let text = screen(&app);
        assert!(text.contains("No products found."));
        assert!(text.contains("Showing 0 of 3 products"));
    }
}
