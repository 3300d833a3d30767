// ============================================================================
// Form - Rendu du formulaire de conversion
// ============================================================================
// Dessine l'interface TUI en utilisant les widgets de ratatui
//
// Disposition :
//   ┌──────── Currency Converter ────────┐  header
//   │ From Currency:      ◀ USD ▶         │
//   │ To Currency:        ◀ EUR ▶         │  formulaire
//   │ Amount:             100█            │
//   │ Converted Amount:   85.00           │
//   │   [c] Clear   [Enter] Convert      │  boutons
//   └────────────────────────────────────┘
//   raccourcis / état                       footer
//
// CONCEPTS RATATUI :
// 1. Frame : surface de dessin
// 2. Layout : découpage de l'espace en zones
// 3. Clear : efface une zone avant de dessiner une popup
// ============================================================================

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, Field, Popup};

/// Largeur de la colonne des libellés
const LABEL_WIDTH: usize = 20;

/// Dessine l'interface complète
///
/// La popup, si elle existe, est dessinée en dernier par-dessus le reste.
pub fn render(frame: &mut Frame, app: &App) {
    let chunks = create_layout(frame.size());

    render_header(frame, chunks[0]);
    render_form(frame, app, chunks[1]);
    render_footer(frame, app, chunks[2]);

    if let Some(popup) = &app.popup {
        render_popup(frame, popup);
    }
}

/// Crée le layout principal (header, formulaire, footer)
fn create_layout(area: Rect) -> Vec<Rect> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header : 3 lignes
            Constraint::Min(0),    // Formulaire : tout le reste
            Constraint::Length(3), // Footer : 3 lignes
        ])
        .split(area)
        .to_vec()
}

// ============================================================================
// Header
// ============================================================================

fn render_header(frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let title = Line::from(Span::styled(
        "Currency Converter",
        Style::default()
            .fg(Color::White)
            .bg(Color::Rgb(51, 153, 255))
            .add_modifier(Modifier::BOLD),
    ));

    let paragraph = Paragraph::new(vec![title])
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

// ============================================================================
// Formulaire
// ============================================================================

/// Dessine les champs, le résultat et les boutons
fn render_form(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let lines = vec![
        Line::from(""),
        selector_line(app, Field::From),
        Line::from(""),
        selector_line(app, Field::To),
        Line::from(""),
        amount_line(app),
        Line::from(""),
        result_line(app),
        Line::from(""),
        buttons_line(app),
    ];

    let paragraph = Paragraph::new(lines).block(block);
    frame.render_widget(paragraph, area);
}

/// Style du libellé : surligné si le champ a le focus
fn label_span(app: &App, field: Field) -> Span<'static> {
    let style = if app.focused == field {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    };
    let marker = if app.focused == field { "▸ " } else { "  " };
    Span::styled(
        format!("{}{:<width$}", marker, field.label(), width = LABEL_WIDTH),
        style,
    )
}

/// Ligne d'un sélecteur de devise : "◀ USD ▶"
fn selector_line(app: &App, field: Field) -> Line<'static> {
    let currency = match field {
        Field::From => app.from,
        _ => app.to,
    };

    let focused = app.focused == field;
    let arrow_style = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let mut value_style = Style::default().fg(Color::White).add_modifier(Modifier::BOLD);
    if focused {
        value_style = value_style.add_modifier(Modifier::REVERSED);
    }

    Line::from(vec![
        label_span(app, field),
        Span::styled("◀ ", arrow_style),
        Span::styled(format!(" {} ", currency.code()), value_style),
        Span::styled(" ▶", arrow_style),
    ])
}

/// Ligne du champ montant, avec curseur si le champ a le focus
fn amount_line(app: &App) -> Line<'static> {
    let mut spans = vec![
        label_span(app, Field::Amount),
        Span::styled(app.amount_input.clone(), Style::default().fg(Color::White)),
    ];

    if app.focused == Field::Amount {
        spans.push(Span::styled(
            "█",
            Style::default().fg(Color::White).add_modifier(Modifier::SLOW_BLINK),
        ));
    }

    Line::from(spans)
}

/// Ligne du résultat, en vert gras
fn result_line(app: &App) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!("  {:<width$}", "Converted Amount:", width = LABEL_WIDTH),
            Style::default().fg(Color::Gray),
        ),
        Span::styled(
            app.result_text.clone(),
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ),
    ])
}

/// Boutons Clear / Convert
///
/// CONCEPT : Bouton désactivé
/// - Pendant une conversion, Convert est grisé et remplacé par un message
fn buttons_line(app: &App) -> Line<'static> {
    let clear = Span::styled(
        " [c] Clear ",
        Style::default()
            .fg(Color::White)
            .bg(Color::Rgb(204, 0, 0))
            .add_modifier(Modifier::BOLD),
    );

    let convert = if app.is_loading_data() {
        Span::styled(
            " [Enter] Converting... ",
            Style::default().fg(Color::DarkGray).bg(Color::Gray),
        )
    } else {
        Span::styled(
            " [Enter] Convert ",
            Style::default()
                .fg(Color::White)
                .bg(Color::Rgb(0, 153, 51))
                .add_modifier(Modifier::BOLD),
        )
    };

    Line::from(vec![Span::raw("  "), clear, Span::raw("   "), convert])
}

// ============================================================================
// Footer : raccourcis, chargement, confirmation de quit
// ============================================================================

fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let key_style = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);

    let line = if app.is_awaiting_quit_confirmation() {
        Line::from(vec![
            Span::styled(
                "⚠  Appuyez sur ",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                "[q]",
                Style::default()
                    .fg(Color::Red)
                    .add_modifier(Modifier::BOLD)
                    .add_modifier(Modifier::SLOW_BLINK),
            ),
            Span::styled(
                " à nouveau pour quitter, ou n'importe quelle autre touche pour annuler ⚠",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
        ])
    } else if let Some(message) = app.loading_message.as_deref().filter(|_| app.is_loading_data()) {
        Line::from(Span::styled(
            format!("⏳ {message}"),
            Style::default().fg(Color::Cyan),
        ))
    } else if let Some(status) = &app.status {
        Line::from(Span::styled(status.clone(), Style::default().fg(Color::Gray)))
    } else {
        Line::from(vec![
            Span::styled("[q]", key_style),
            Span::raw(" Quit  "),
            Span::styled("[Tab/↑↓]", key_style),
            Span::raw(" Field  "),
            Span::styled("[←→ / h l]", key_style),
            Span::raw(" Currency  "),
            Span::styled("[Enter]", key_style),
            Span::raw(" Convert  "),
            Span::styled("[c]", key_style),
            Span::raw(" Clear"),
        ])
    };

    let paragraph = Paragraph::new(vec![line])
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

// ============================================================================
// Popup modale
// ============================================================================

/// Dessine une popup centrée
///
/// CONCEPT RATATUI : Clear
/// - Efface la zone (sinon le formulaire transparaît sous la popup)
fn render_popup(frame: &mut Frame, popup: &Popup) {
    let area = centered_rect(50, 7, frame.size());

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red))
        .title(format!(" {} ", popup.title))
        .title_alignment(Alignment::Center);

    let text = vec![
        Line::from(""),
        Line::from(Span::styled(
            popup.message.clone(),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("[Enter]", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
            Span::raw(" OK"),
        ]),
    ];

    let paragraph = Paragraph::new(text)
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });

    frame.render_widget(Clear, area);
    frame.render_widget(paragraph, area);
}

/// Rectangle centré : `percent_x`% de la largeur, `height` lignes
fn centered_rect(percent_x: u16, height: u16, area: Rect) -> Rect {
    let height = height.min(area.height);
    // Calcul en u32 : width * percent dépasse u16 au-delà de ~1310 colonnes
    let width = (u32::from(area.width) * u32::from(percent_x.min(100)) / 100) as u16;

    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

// ============================================================================
// Tests
// ============================================================================
