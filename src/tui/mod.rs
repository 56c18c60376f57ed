use anyhow::{Context, Result};
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers, MouseButton,
        MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
};
use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

use crate::api::ScriptStore;
use crate::gesture::{
    GestureConfig, GestureEngine, MoveFrame, Outcome, Point, SwipeDirection, SwipeFrame,
};
use crate::queue::{ReviewQueueController, SettleSignal};
use crate::{Decision, DecisionState, OTHER_REASON_ID, RejectionReason, ReviewStats, ReviewStatus};

/// Terminal cells are taller than wide; scale them into the gesture
/// engine's logical units so the default thresholds behave.
const CELL_UNIT_X: f32 = 10.0;
const CELL_UNIT_Y: f32 = 20.0;

/// Resolution of a detached store call, delivered back to the UI loop.
struct SettleMsg {
    script_id: String,
    decision: Decision,
    result: std::result::Result<(), String>,
}

/// State of the rejection reason picker.
struct RejectModal {
    selected: usize,
    comment: String,
    editing_comment: bool,
}

/// Application state for the TUI.
pub struct App {
    store: Arc<dyn ScriptStore>,
    queue: ReviewQueueController,
    engine: GestureEngine,
    reasons: Vec<RejectionReason>,
    stats: Option<ReviewStats>,
    card_frame: Option<SwipeFrame>,
    content_scroll: u16,
    last_drag_row: Option<u16>,
    card_area: Rect,
    content_area: Rect,
    reject_modal: Option<RejectModal>,
    status_message: Option<(String, Instant)>,
    show_help: bool,
    should_quit: bool,
    settle_tx: mpsc::UnboundedSender<SettleMsg>,
    settle_rx: mpsc::UnboundedReceiver<SettleMsg>,
}

impl App {
    /// Create the app around a pre-loaded queue.
    pub fn new(
        store: Arc<dyn ScriptStore>,
        queue: ReviewQueueController,
        reasons: Vec<RejectionReason>,
        stats: Option<ReviewStats>,
    ) -> Self {
        let (settle_tx, settle_rx) = mpsc::unbounded_channel();
        Self {
            store,
            queue,
            engine: GestureEngine::new(GestureConfig::default(), 80.0 * CELL_UNIT_X),
            reasons,
            stats,
            card_frame: None,
            content_scroll: 0,
            last_drag_row: None,
            card_area: Rect::default(),
            content_area: Rect::default(),
            reject_modal: None,
            status_message: None,
            show_help: false,
            should_quit: false,
            settle_tx,
            settle_rx,
        }
    }

    fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some((message.into(), Instant::now()));
    }

    /// Start a decision on the current card and run the store call detached,
    /// so the queue stays interactive while it is in flight.
    fn begin_decision(
        &mut self,
        decision: Decision,
        reason_id: Option<String>,
        comment: Option<String>,
    ) -> bool {
        match self.queue.begin(decision, reason_id, comment) {
            Ok(Some(ticket)) => {
                let store = Arc::clone(&self.store);
                let tx = self.settle_tx.clone();
                tokio::spawn(async move {
                    let result = store
                        .review_script(
                            &ticket.script_id,
                            ticket.decision,
                            ticket.reason_id.as_deref(),
                            ticket.comment.as_deref(),
                        )
                        .await
                        .map_err(|e| e.to_string());
                    let _ = tx.send(SettleMsg {
                        script_id: ticket.script_id,
                        decision: ticket.decision,
                        result,
                    });
                });
                true
            }
            Ok(None) => false,
            Err(e) => {
                self.set_status(e.to_string());
                false
            }
        }
    }

    /// Apply any store responses that arrived since the last tick.
    fn drain_settled(&mut self) {
        while let Ok(msg) = self.settle_rx.try_recv() {
            match self.queue.settle(&msg.script_id, msg.decision, msg.result) {
                SettleSignal::Advanced => {
                    self.content_scroll = 0;
                    self.bump_stats(msg.decision);
                    if self.queue.is_exhausted() {
                        if self.queue.has_more() {
                            self.set_status("Page done - press n for the next page");
                        } else {
                            self.set_status("Queue exhausted");
                        }
                    }
                }
                SettleSignal::RolledBack(message) => {
                    self.set_status(format!("Review failed: {message} - press again to retry"));
                }
                SettleSignal::Stale => {}
            }
        }
    }

    fn bump_stats(&mut self, decision: Decision) {
        if let Some(stats) = self.stats.as_mut() {
            stats.total_pending = stats.total_pending.saturating_sub(1);
            match decision {
                Decision::Approve => stats.total_approved += 1,
                Decision::Reject => stats.total_rejected += 1,
            }
        }
    }

    fn open_reject_modal(&mut self) {
        let pending = self
            .queue
            .current()
            .map(|item| item.state == DecisionState::Pending)
            .unwrap_or(false);
        if pending && !self.reasons.is_empty() {
            self.reject_modal = Some(RejectModal {
                selected: 0,
                comment: String::new(),
                editing_comment: false,
            });
        }
    }

    fn submit_reject_modal(&mut self) {
        let Some(modal) = self.reject_modal.as_ref() else {
            return;
        };
        let reason = &self.reasons[modal.selected];
        let reason_id = reason.id.clone();
        let comment = if modal.comment.trim().is_empty() {
            None
        } else {
            Some(modal.comment.clone())
        };
        if self.begin_decision(Decision::Reject, Some(reason_id), comment) {
            self.reject_modal = None;
        }
        // On validation failure the modal stays open with the message in the
        // status bar, so the reason/comment can be corrected.
    }

    /// Handle keyboard input while the reject modal is open.
    fn handle_modal_key(&mut self, key: event::KeyEvent) {
        let Some(modal) = self.reject_modal.as_mut() else {
            return;
        };

        if modal.editing_comment {
            match key.code {
                KeyCode::Esc => modal.editing_comment = false,
                KeyCode::Enter => self.submit_reject_modal(),
                KeyCode::Backspace => {
                    modal.comment.pop();
                }
                KeyCode::Char(c) => modal.comment.push(c),
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => {
                self.reject_modal = None;
            }
            KeyCode::Char('j') | KeyCode::Down => {
                if modal.selected + 1 < self.reasons.len() {
                    modal.selected += 1;
                }
            }
            KeyCode::Char('k') | KeyCode::Up => {
                modal.selected = modal.selected.saturating_sub(1);
            }
            KeyCode::Enter => {
                // The free-text reason needs a comment before it can go out.
                if self.reasons[modal.selected].id == OTHER_REASON_ID
                    && modal.comment.trim().is_empty()
                {
                    modal.editing_comment = true;
                } else {
                    self.submit_reject_modal();
                }
            }
            KeyCode::Char('c') => {
                modal.editing_comment = true;
            }
            _ => {}
        }
    }

    /// Handle keyboard input, dispatching to the modal or the main view.
    async fn handle_key(&mut self, key: event::KeyEvent) -> Result<()> {
        if self.show_help {
            // Any key closes help.
            self.show_help = false;
            return Ok(());
        }

        if self.reject_modal.is_some() {
            self.handle_modal_key(key);
            return Ok(());
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Char('?') => {
                self.show_help = true;
            }
            KeyCode::Char('a') | KeyCode::Right => {
                self.begin_decision(Decision::Approve, None, None);
            }
            KeyCode::Char('r') | KeyCode::Left => {
                self.open_reject_modal();
            }
            KeyCode::Char('j') | KeyCode::Down => {
                self.content_scroll = self.content_scroll.saturating_add(1);
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.content_scroll = self.content_scroll.saturating_sub(1);
            }
            KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.content_scroll = self.content_scroll.saturating_add(10);
            }
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.content_scroll = self.content_scroll.saturating_sub(10);
            }
            KeyCode::PageDown => {
                self.content_scroll = self.content_scroll.saturating_add(20);
            }
            KeyCode::PageUp => {
                self.content_scroll = self.content_scroll.saturating_sub(20);
            }
            KeyCode::Char('n') => {
                if self.queue.is_exhausted() {
                    match self.queue.next_page().await {
                        Ok(_) => self.content_scroll = 0,
                        Err(e) => self.set_status(format!("Load failed: {e}")),
                    }
                }
            }
            KeyCode::Char('f') => {
                let mut filters = self.queue.filters().clone();
                filters.status = cycle_status(filters.status);
                let label = status_label(filters.status);
                match self.queue.set_filters(filters).await {
                    Ok(_) => {
                        self.content_scroll = 0;
                        self.set_status(format!("Filter: {label}"));
                    }
                    Err(e) => self.set_status(format!("Load failed: {e}")),
                }
            }
            KeyCode::Char('s') => match self.store.stats().await {
                Ok(stats) => self.stats = Some(stats),
                Err(e) => self.set_status(format!("Stats unavailable: {e}")),
            },
            _ => {}
        }
        Ok(())
    }

    /// Feed mouse press/drag/release into the gesture engine.
    fn handle_mouse(&mut self, mouse: MouseEvent) {
        if self.reject_modal.is_some() || self.show_help {
            return;
        }

        let position = Position::new(mouse.column, mouse.row);
        let point = Point::new(
            mouse.column as f32 * CELL_UNIT_X,
            mouse.row as f32 * CELL_UNIT_Y,
        );

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if self.card_area.contains(position) && !self.queue.is_exhausted() {
                    self.engine
                        .on_start(point, self.content_area.contains(position));
                    self.last_drag_row = Some(mouse.row);
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => match self.engine.on_move(point) {
                MoveFrame::Pending => {}
                MoveFrame::Scroll => {
                    // Native-scroll analog: the content follows the pointer.
                    if let Some(prev) = self.last_drag_row.replace(mouse.row) {
                        if mouse.row < prev {
                            self.content_scroll =
                                self.content_scroll.saturating_add(prev - mouse.row);
                        } else {
                            self.content_scroll =
                                self.content_scroll.saturating_sub(mouse.row - prev);
                        }
                    }
                }
                MoveFrame::Swipe(frame) => {
                    self.card_frame = Some(frame);
                }
            },
            MouseEventKind::Up(MouseButton::Left) => {
                self.last_drag_row = None;
                let outcome = self.engine.on_end();
                // Snap back to rest in every case; a committed card exits
                // through the decision flow instead.
                self.card_frame = None;
                match outcome {
                    Outcome::Pass | Outcome::Cancel => {}
                    Outcome::Commit(SwipeDirection::Approve) => {
                        self.begin_decision(Decision::Approve, None, None);
                    }
                    Outcome::Commit(SwipeDirection::Reject) => {
                        self.open_reject_modal();
                    }
                }
            }
            // The wheel keeps scrolling content, but not while a swipe owns
            // the gesture.
            MouseEventKind::ScrollDown if !self.engine.is_swiping() => {
                self.content_scroll = self.content_scroll.saturating_add(3);
            }
            MouseEventKind::ScrollUp if !self.engine.is_swiping() => {
                self.content_scroll = self.content_scroll.saturating_sub(3);
            }
            _ => {}
        }
    }

    /// Render the UI.
    fn render(&mut self, frame: &mut Frame) {
        // Expire old status messages.
        let expired = self
            .status_message
            .as_ref()
            .map(|(_, time)| time.elapsed() >= Duration::from_secs(3))
            .unwrap_or(false);
        if expired {
            self.status_message = None;
        }

        self.engine
            .set_viewport_width(frame.area().width as f32 * CELL_UNIT_X);

        if self.show_help {
            self.render_help(frame);
            return;
        }

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(3)])
            .split(frame.area());

        self.render_card(frame, chunks[0]);
        self.render_status_bar(frame, chunks[1]);

        if self.reject_modal.is_some() {
            self.render_reject_modal(frame);
        }
    }

    /// Render the review card (or the empty state).
    fn render_card(&mut self, frame: &mut Frame, area: Rect) {
        self.card_area = area;

        let Some(item) = self.queue.current() else {
            self.content_area = Rect::default();
            let message = if self.queue.has_more() {
                "Page done.\n\nn: load next page   f: change filter   q: quit"
            } else {
                "Queue exhausted - nothing left to review.\n\nf: change filter   q: quit"
            };
            let paragraph = Paragraph::new(message)
                .block(Block::default().borders(Borders::ALL).title("Review Queue"))
                .wrap(Wrap { trim: false });
            frame.render_widget(paragraph, area);
            return;
        };

        let shift = self
            .card_frame
            .map(|f| (f.translation / CELL_UNIT_X).round() as i32)
            .unwrap_or(0);
        let card = shifted(area, shift);
        self.card_area = card;

        let meta = &item.script.metadata;
        let state_tag = match item.state {
            DecisionState::Pending => "",
            DecisionState::Approving => " [APPROVING…]",
            DecisionState::Approved => " [APPROVED]",
            DecisionState::Rejecting => " [REJECTING…]",
            DecisionState::Rejected => " [REJECTED]",
        };
        let title = format!(
            "{} | {} | {} ({} words){}",
            meta.dj,
            meta.content_type,
            meta.timestamp.format("%Y-%m-%d %H:%M"),
            meta.word_count,
            state_tag
        );

        let block = Block::default().borders(Borders::ALL).title(title);
        let inner = block.inner(card);
        frame.render_widget(block, card);

        // One header row for the indicators, the rest scrolls.
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(1)])
            .split(inner);
        self.content_area = rows[1];

        self.render_indicators(frame, rows[0]);

        let paragraph = Paragraph::new(item.script.content.as_str())
            .wrap(Wrap { trim: false })
            .scroll((self.content_scroll, 0));
        frame.render_widget(paragraph, rows[1]);
    }

    /// Render the approve/reject indicators with gesture-driven intensity.
    fn render_indicators(&self, frame: &mut Frame, area: Rect) {
        let (approve, reject) = self
            .card_frame
            .map(|f| (f.approve, f.reject))
            .unwrap_or((0.0, 0.0));

        let halves = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(area);

        if reject > 0.0 {
            let label = Paragraph::new(Span::styled("◀ REJECT", indicator_style(Color::Red, reject)));
            frame.render_widget(label, halves[0]);
        }
        if approve > 0.0 {
            let label = Paragraph::new(
                Line::from(Span::styled("APPROVE ▶", indicator_style(Color::Green, approve)))
                    .right_aligned(),
            );
            frame.render_widget(label, halves[1]);
        }
    }

    /// Render the status bar.
    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let status_text = match &self.status_message {
            Some((msg, _)) => msg.clone(),
            None => {
                let (pos, len, page, pages) = self.queue.position();
                let tally = match &self.stats {
                    Some(s) => format!(
                        "{} pending / {} approved / {} rejected",
                        s.total_pending, s.total_approved, s.total_rejected
                    ),
                    None => "stats unavailable".to_string(),
                };
                format!(
                    "Script {}/{} (page {}/{}) | Filter: {} | {} | Keys: drag card or a/r=approve/reject j/k=scroll f=filter n=next-page s=stats ?=help q=quit",
                    pos,
                    len,
                    page,
                    pages,
                    status_label(self.queue.filters().status),
                    tally
                )
            }
        };

        let paragraph = Paragraph::new(status_text)
            .block(Block::default().borders(Borders::ALL))
            .wrap(Wrap { trim: false });

        frame.render_widget(paragraph, area);
    }

    /// Render the rejection reason picker.
    fn render_reject_modal(&self, frame: &mut Frame) {
        let Some(modal) = self.reject_modal.as_ref() else {
            return;
        };

        let area = centered_rect(60, 60, frame.area());
        frame.render_widget(Clear, area);

        let block = Block::default()
            .borders(Borders::ALL)
            .title("Reject - choose a reason");
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(2)])
            .split(inner);

        let items: Vec<ListItem> = self
            .reasons
            .iter()
            .enumerate()
            .map(|(idx, reason)| {
                let prefix = if idx == modal.selected { ">" } else { " " };
                let style = if idx == modal.selected {
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                ListItem::new(format!("{} {} ({})", prefix, reason.label, reason.category))
                    .style(style)
            })
            .collect();
        frame.render_widget(List::new(items), chunks[0]);

        let comment_line = if modal.editing_comment {
            format!("Comment: {}█", modal.comment)
        } else if modal.comment.is_empty() {
            "j/k: select  Enter: reject  c: add comment  Esc: cancel".to_string()
        } else {
            format!("Comment: {}  (Enter: reject)", modal.comment)
        };
        let footer = Paragraph::new(comment_line).style(Style::default().fg(Color::DarkGray));
        frame.render_widget(footer, chunks[1]);
    }

    /// Render the help overlay.
    fn render_help(&self, frame: &mut Frame) {
        let help_text = vec![
            "Script Review - Keyboard & Mouse",
            "",
            "Reviewing:",
            "  drag right     - Approve (past the commit threshold)",
            "  drag left      - Reject (opens the reason picker)",
            "  a / Right      - Approve",
            "  r / Left       - Reject",
            "",
            "Reading:",
            "  drag vertically in the text, or j/k / wheel - Scroll content",
            "  Ctrl+d/u, PgDn/PgUp                         - Scroll faster",
            "",
            "Queue:",
            "  n              - Next page (when the current one is done)",
            "  f              - Cycle status filter",
            "  s              - Refresh statistics",
            "",
            "Other:",
            "  ?              - Show this help",
            "  q / Esc        - Quit",
            "",
            "Press any key to close this help",
        ];

        let text = Text::from(help_text.iter().map(|&s| Line::from(s)).collect::<Vec<_>>());

        let paragraph = Paragraph::new(text)
            .block(Block::default().borders(Borders::ALL).title("Help"))
            .wrap(Wrap { trim: false });

        let area = centered_rect(60, 80, frame.area());
        frame.render_widget(paragraph, area);
    }
}

fn indicator_style(color: Color, opacity: f32) -> Style {
    // Terminal analog of a continuous opacity ramp.
    let style = Style::default().fg(color);
    if opacity >= 1.0 {
        style.add_modifier(Modifier::BOLD | Modifier::REVERSED)
    } else if opacity >= 0.5 {
        style.add_modifier(Modifier::BOLD)
    } else {
        style.add_modifier(Modifier::DIM)
    }
}

fn status_label(status: Option<ReviewStatus>) -> &'static str {
    match status {
        Some(ReviewStatus::Pending) => "pending",
        Some(ReviewStatus::Approved) => "approved",
        Some(ReviewStatus::Rejected) => "rejected",
        None => "all",
    }
}

fn cycle_status(status: Option<ReviewStatus>) -> Option<ReviewStatus> {
    match status {
        Some(ReviewStatus::Pending) => Some(ReviewStatus::Approved),
        Some(ReviewStatus::Approved) => Some(ReviewStatus::Rejected),
        Some(ReviewStatus::Rejected) => None,
        None => Some(ReviewStatus::Pending),
    }
}

/// Shift a rect horizontally, clamped so it stays on screen.
fn shifted(area: Rect, shift: i32) -> Rect {
    if shift == 0 || area.width < 4 {
        return area;
    }
    let max_shift = (area.width / 2) as i32;
    let s = shift.clamp(-max_shift, max_shift);
    if s >= 0 {
        Rect {
            x: area.x + s as u16,
            y: area.y,
            width: area.width - s as u16,
            height: area.height,
        }
    } else {
        Rect {
            x: area.x,
            y: area.y,
            width: area.width - s.unsigned_abs() as u16,
            height: area.height,
        }
    }
}

/// Create a centered rectangle.
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

/// Setup the terminal for TUI rendering.
fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
        .context("Failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend).context("Failed to create terminal")
}

/// Restore the terminal to its original state.
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .context("Failed to leave alternate screen")?;
    terminal.show_cursor().context("Failed to show cursor")?;
    Ok(())
}

/// Launch the interactive review interface.
///
/// Accepts a pre-configured App (created via `App::new` around a loaded
/// queue).
pub async fn run_tui(mut app: App) -> Result<()> {
    // Setup panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        original_hook(panic_info);
    }));

    let mut terminal = setup_terminal()?;

    // Main event loop
    let result = async {
        loop {
            app.drain_settled();

            terminal
                .draw(|f| app.render(f))
                .context("Failed to draw frame")?;

            if app.should_quit {
                break;
            }

            if event::poll(Duration::from_millis(100)).context("Failed to poll events")? {
                match event::read().context("Failed to read event")? {
                    Event::Key(key) if key.kind == event::KeyEventKind::Press => {
                        app.handle_key(key).await?;
                    }
                    Event::Mouse(mouse) => app.handle_mouse(mouse),
                    _ => {}
                }
            }
        }
        Ok(())
    }
    .await;

    // Restore terminal in all cases
    restore_terminal(&mut terminal)?;

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shifted_clamps_to_half_width() {
        let area = Rect::new(0, 0, 100, 30);
        let right = shifted(area, 80);
        assert_eq!(right.x, 50);
        assert_eq!(right.width, 50);

        let left = shifted(area, -10);
        assert_eq!(left.x, 0);
        assert_eq!(left.width, 90);

        assert_eq!(shifted(area, 0), area);
    }

    #[test]
    fn status_cycle_covers_all_states() {
        let mut status = Some(ReviewStatus::Pending);
        let mut seen = vec![status];
        for _ in 0..3 {
            status = cycle_status(status);
            seen.push(status);
        }
        assert_eq!(cycle_status(status), Some(ReviewStatus::Pending));
        assert_eq!(seen.len(), 4);
    }

    #[test]
    fn indicator_style_ramps_with_opacity() {
        assert!(indicator_style(Color::Green, 0.2)
            .add_modifier
            .contains(Modifier::DIM));
        assert!(indicator_style(Color::Green, 1.0)
            .add_modifier
            .contains(Modifier::REVERSED));
    }
}
