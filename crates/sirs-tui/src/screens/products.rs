//! Products screen — the catalog table driven by the view-state controller.

use std::sync::Arc;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, TableState, Wrap};
use tui_input::{Input, InputRequest};

use sirs_core::{
    EntityId, FilterPatch, Product, ProductField, SavedView, SortDirection, SortSpec, StockFilter,
    ViewController,
};

use crate::action::Action;
use crate::component::Component;
use crate::theme;
use crate::widgets::{overlay, sub_tabs};

const STOCK_TABS: [StockFilter; 4] = [
    StockFilter::All,
    StockFilter::InStock,
    StockFilter::OutOfStock,
    StockFilter::LowStock,
];
const STOCK_LABELS: [&str; 4] = ["All", "In stock", "Out of stock", "Low stock"];

/// Sortable columns, in display order. Number keys 1-6 pick them.
const COLUMNS: [(ProductField, &str); 6] = [
    (ProductField::Id, "#"),
    (ProductField::Name, "Name"),
    (ProductField::Brand, "Brand"),
    (ProductField::Category, "Category"),
    (ProductField::Price, "Price"),
    (ProductField::Stock, "Stock"),
];

const PAGE_SIZE_STEP: usize = 5;

/// Entries of the per-row action menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RowAction {
    Details,
    ToggleSelect,
    Delete,
}

const ROW_ACTIONS: [RowAction; 3] = [RowAction::Details, RowAction::ToggleSelect, RowAction::Delete];

/// Saved-view cycle: none → low stock → out of stock → recent → none.
fn next_saved_view(current: Option<SavedView>) -> Option<SavedView> {
    match current {
        None => Some(SavedView::LowStock),
        Some(SavedView::LowStock) => Some(SavedView::OutOfStock),
        Some(SavedView::OutOfStock) => Some(SavedView::Recent),
        Some(SavedView::Recent) => None,
    }
}

pub struct ProductsScreen {
    focused: bool,
    view: ViewController,
    /// Cursor within the current page.
    table_state: TableState,
    search: Input,
    search_active: bool,
    menu_cursor: usize,
    detail: Option<EntityId>,
    loading: bool,
}

impl ProductsScreen {
    pub fn new(page_size: usize) -> Self {
        Self {
            focused: false,
            view: ViewController::new(page_size),
            table_state: TableState::default(),
            search: Input::default(),
            search_active: false,
            menu_cursor: 0,
            detail: None,
            loading: false,
        }
    }

    // ── Cursor ───────────────────────────────────────────────────────

    fn page_len(&self) -> usize {
        self.view.derived().rows.len()
    }

    fn cursor_product(&self) -> Option<&Arc<Product>> {
        self.view.derived().rows.get(self.table_state.selected()?)
    }

    fn select(&mut self, idx: usize) {
        let len = self.page_len();
        self.table_state
            .select(if len == 0 { None } else { Some(idx.min(len - 1)) });
    }

    fn move_cursor(&mut self, delta: isize) {
        let current = self.table_state.selected().unwrap_or(0);
        self.select(current.saturating_add_signed(delta));
    }

    fn clamp_cursor(&mut self) {
        self.select(self.table_state.selected().unwrap_or(0));
    }

    // ── View changes ─────────────────────────────────────────────────

    fn apply_search(&mut self) {
        self.view
            .apply_filter(FilterPatch::search(self.search.value()));
        self.select(0);
    }

    fn stock_index(&self) -> usize {
        STOCK_TABS
            .iter()
            .position(|s| *s == self.view.criteria().stock)
            .unwrap_or(0)
    }

    fn cycle_stock(&mut self, forward: bool) {
        let len = STOCK_TABS.len();
        let idx = self.stock_index();
        let next = if forward {
            (idx + 1) % len
        } else {
            (idx + len - 1) % len
        };
        self.view.apply_filter(FilterPatch::stock(STOCK_TABS[next]));
        self.select(0);
    }

    fn sort_by_column(&mut self, digit: char) {
        let column = digit
            .to_digit(10)
            .and_then(|d| usize::try_from(d).ok())
            .and_then(|d| d.checked_sub(1))
            .and_then(|i| COLUMNS.get(i));
        if let Some(&(field, _)) = column {
            self.view.apply_sort(field);
        }
    }

    fn reset_sort(&mut self) {
        let default = SortSpec::default();
        // apply_sort toggles; two calls at most land on the default
        for _ in 0..2 {
            if self.view.sort() != default {
                self.view.apply_sort(default.field);
            }
        }
    }

    fn cycle_saved_view(&mut self) {
        match next_saved_view(self.view.saved_view()) {
            Some(view) => self.view.apply_saved_view(view),
            None => {
                self.view.clear_filters();
                self.reset_sort();
            }
        }
        self.search.reset();
        self.select(0);
    }

    fn clear_filters(&mut self) {
        self.view.clear_filters();
        self.search.reset();
        self.select(0);
    }

    fn change_page(&mut self, forward: bool) {
        if forward {
            self.view.next_page();
        } else {
            self.view.prev_page();
        }
        self.select(0);
    }

    fn change_page_size(&mut self, grow: bool) {
        let size = self.view.window().page_size();
        let next = if grow {
            size.saturating_add(PAGE_SIZE_STEP)
        } else {
            size.saturating_sub(PAGE_SIZE_STEP).max(PAGE_SIZE_STEP)
        };
        self.view.set_page_size(next);
        self.clamp_cursor();
    }

    /// Selected rows, or the cursor row when nothing is selected.
    fn delete_request(&self) -> Option<Action> {
        let ids = if self.view.selection().is_empty() {
            vec![self.cursor_product()?.id]
        } else {
            self.view.selection().ids()
        };
        Some(Action::RequestDelete(ids))
    }

    fn detail_product(&self) -> Option<Arc<Product>> {
        let id = self.detail?;
        self.view.entities().iter().find(|p| p.id == id).cloned()
    }

    // ── Key handling per mode ────────────────────────────────────────

    fn handle_search_key(&mut self, key: KeyEvent) {
        let request = match (key.modifiers, key.code) {
            (_, KeyCode::Esc) => {
                let had_text = !self.search.value().is_empty();
                self.search.reset();
                self.search_active = false;
                if had_text {
                    self.apply_search();
                }
                return;
            }
            (_, KeyCode::Enter) => {
                self.search_active = false;
                return;
            }
            (KeyModifiers::CONTROL, KeyCode::Char('u')) => InputRequest::DeleteLine,
            (KeyModifiers::CONTROL, KeyCode::Char('w')) => InputRequest::DeletePrevWord,
            (m, KeyCode::Char(c)) if !m.contains(KeyModifiers::CONTROL) => {
                InputRequest::InsertChar(c)
            }
            (_, KeyCode::Backspace) => InputRequest::DeletePrevChar,
            (_, KeyCode::Delete) => InputRequest::DeleteNextChar,
            (_, KeyCode::Left) => InputRequest::GoToPrevChar,
            (_, KeyCode::Right) => InputRequest::GoToNextChar,
            (_, KeyCode::Home) => InputRequest::GoToStart,
            (_, KeyCode::End) => InputRequest::GoToEnd,
            _ => return,
        };

        if self.search.handle(request).is_some_and(|change| change.value) {
            self.apply_search();
        }
    }

    /// Insert pasted text at the cursor. Line breaks and other control
    /// characters are dropped so a pasted row stays on one line.
    fn paste_into_search(&mut self, text: &str) {
        let mut changed = false;
        for c in text.chars().filter(|c| !c.is_control()) {
            changed |= self
                .search
                .handle(InputRequest::InsertChar(c))
                .is_some_and(|change| change.value);
        }
        if changed {
            self.apply_search();
        }
    }

    fn handle_menu_key(&mut self, key: KeyEvent) -> Option<Action> {
        let id = self.view.active_menu()?;
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                self.menu_cursor = (self.menu_cursor + 1).min(ROW_ACTIONS.len() - 1);
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.menu_cursor = self.menu_cursor.saturating_sub(1);
                None
            }
            KeyCode::Esc => {
                self.view.close_menu();
                None
            }
            KeyCode::Enter => {
                self.view.close_menu();
                match ROW_ACTIONS.get(self.menu_cursor).copied()? {
                    RowAction::Details => {
                        self.detail = Some(id);
                        None
                    }
                    RowAction::ToggleSelect => {
                        self.view.select_row(id);
                        None
                    }
                    RowAction::Delete => Some(Action::RequestDelete(vec![id])),
                }
            }
            _ => None,
        }
    }

    fn handle_table_key(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.move_cursor(1),
            KeyCode::Char('k') | KeyCode::Up => self.move_cursor(-1),
            KeyCode::Char('g') | KeyCode::Home => self.select(0),
            KeyCode::Char('G') | KeyCode::End => self.select(usize::MAX),
            KeyCode::Char('l' | ']') | KeyCode::Right | KeyCode::PageDown => {
                self.change_page(true);
            }
            KeyCode::Char('h' | '[') | KeyCode::Left | KeyCode::PageUp => {
                self.change_page(false);
            }
            KeyCode::Char('/') => self.search_active = true,
            KeyCode::Tab => self.cycle_stock(true),
            KeyCode::BackTab => self.cycle_stock(false),
            KeyCode::Char(c @ '1'..='6') => self.sort_by_column(c),
            KeyCode::Char('v') => self.cycle_saved_view(),
            KeyCode::Char('X') => self.clear_filters(),
            KeyCode::Char('+') => self.change_page_size(true),
            KeyCode::Char('-') => self.change_page_size(false),
            KeyCode::Char(' ') => {
                if let Some(id) = self.cursor_product().map(|p| p.id) {
                    self.view.select_row(id);
                }
            }
            KeyCode::Char('a') => self.view.select_all(),
            KeyCode::Enter => {
                if let Some(id) = self.cursor_product().map(|p| p.id) {
                    self.view.toggle_menu(id);
                    self.menu_cursor = 0;
                }
            }
            KeyCode::Char('d') | KeyCode::Delete => return self.delete_request(),
            KeyCode::Char('r') => return Some(Action::Refresh),
            KeyCode::Esc => {
                if self.detail.is_some() {
                    self.detail = None;
                } else {
                    self.view.clear_selection();
                }
            }
            _ => {}
        }
        None
    }

    // ── Rendering ────────────────────────────────────────────────────

    fn render_search_line(&self, frame: &mut Frame, area: Rect) {
        let summary = &self.view.derived().summary;
        let mut right = vec![Span::styled(
            format!(
                "{} products · {} low · {} out · value {:.2} ",
                summary.total, summary.low_stock, summary.out_of_stock, summary.inventory_value
            ),
            theme::key_hint(),
        )];
        if let Some(view) = self.view.saved_view() {
            right.insert(
                0,
                Span::styled(format!("◆ {}  ", view.label()), theme::row_marked()),
            );
        }
        let right = Line::from(right);
        let right_width = u16::try_from(right.width()).unwrap_or(area.width);

        let [left_area, right_area] =
            Layout::horizontal([Constraint::Min(10), Constraint::Length(right_width)])
                .areas(area);

        let prompt_style = if self.search_active {
            Style::default().fg(theme::ACCENT_PURPLE)
        } else {
            theme::key_hint()
        };
        let [prompt_area, input_area] =
            Layout::horizontal([Constraint::Length(3), Constraint::Min(1)]).areas(left_area);
        frame.render_widget(Paragraph::new(Span::styled(" / ", prompt_style)), prompt_area);

        let width = usize::from(input_area.width.max(1) - 1);
        let scroll = self.search.visual_scroll(width);
        let text = if self.search.value().is_empty() && !self.search_active {
            Span::styled("search name, brand, category, model…", theme::key_hint())
        } else {
            Span::styled(self.search.value(), Style::default().fg(theme::NEON_CYAN))
        };
        frame.render_widget(
            Paragraph::new(text).scroll((0, u16::try_from(scroll).unwrap_or(0))),
            input_area,
        );
        if self.search_active {
            let offset = self.search.visual_cursor().saturating_sub(scroll);
            let x = input_area
                .x
                .saturating_add(u16::try_from(offset).unwrap_or(u16::MAX))
                .min(input_area.right().saturating_sub(1));
            frame.set_cursor_position((x, input_area.y));
        }

        frame.render_widget(
            Paragraph::new(right).alignment(Alignment::Right),
            right_area,
        );
    }

    fn header_row(&self) -> Row<'static> {
        let sort = self.view.sort();
        let mut cells = vec![Cell::from(" ").style(theme::table_header())];
        for (n, (field, label)) in COLUMNS.iter().enumerate() {
            if *field == sort.field {
                let arrow = match sort.direction {
                    SortDirection::Asc => "▲",
                    SortDirection::Desc => "▼",
                };
                cells.push(
                    Cell::from(format!("{label} {arrow}")).style(theme::table_header_sorted()),
                );
            } else {
                cells.push(Cell::from(format!("{label}·{}", n + 1)).style(theme::table_header()));
            }
        }
        Row::new(cells)
    }

    /// Draw the table and return the state after rendering, so the menu
    /// can be anchored to the on-screen row.
    fn render_table(&self, frame: &mut Frame, area: Rect) -> TableState {
        let derived = self.view.derived();

        if derived.rows.is_empty() {
            let msg = if self.loading {
                "Loading products…"
            } else if self.view.entities().is_empty() {
                "No products yet. Press r to refresh."
            } else {
                "No products match the current filters. Press X to clear them."
            };
            frame.render_widget(
                Paragraph::new(Span::styled(msg, theme::key_hint()))
                    .alignment(Alignment::Center)
                    .wrap(Wrap { trim: true }),
                area,
            );
            return TableState::default();
        }

        let selection = self.view.selection();
        let rows: Vec<Row> = derived
            .rows
            .iter()
            .map(|p| {
                let marker = if selection.contains(p.id) { "●" } else { " " };
                Row::new(vec![
                    Cell::from(marker).style(theme::row_marked()),
                    Cell::from(p.id.to_string()),
                    Cell::from(p.name.clone()),
                    Cell::from(p.brand.clone()),
                    Cell::from(p.category_name().to_owned()),
                    Cell::from(p.price.clone()),
                    Cell::from(p.stock.clone())
                        .style(Style::default().fg(theme::stock_color(p.stock_level()))),
                ])
                .style(theme::table_row())
            })
            .collect();

        let widths = [
            Constraint::Length(1),
            Constraint::Length(7),
            Constraint::Fill(3),
            Constraint::Fill(2),
            Constraint::Fill(2),
            Constraint::Length(11),
            Constraint::Length(8),
        ];

        let table = Table::new(rows, widths)
            .header(self.header_row())
            .row_highlight_style(theme::table_selected())
            .highlight_symbol("▸ ");

        let mut state = self.table_state.clone();
        frame.render_stateful_widget(table, area, &mut state);
        state
    }

    fn render_menu(&self, frame: &mut Frame, table_area: Rect, state: &TableState, id: EntityId) {
        let Some(selected) = state.selected() else {
            return;
        };
        let visible_row = selected.saturating_sub(state.offset());
        let row_y = table_area
            .y
            .saturating_add(1)
            .saturating_add(u16::try_from(visible_row).unwrap_or(u16::MAX));

        let height = u16::try_from(ROW_ACTIONS.len()).unwrap_or(3) + 2;
        let rect = overlay::anchored(table_area, table_area.x + 4, row_y, 22, height);
        let inner = overlay::panel(
            frame,
            rect,
            Some(format!("#{id}").as_str()),
            theme::border_focused(),
        );

        let selected_row = self.view.selection().contains(id);
        let lines: Vec<Line> = ROW_ACTIONS
            .iter()
            .enumerate()
            .map(|(i, action)| {
                let label = match action {
                    RowAction::Details => "Details",
                    RowAction::ToggleSelect if selected_row => "Deselect",
                    RowAction::ToggleSelect => "Select",
                    RowAction::Delete => "Delete…",
                };
                let style = if i == self.menu_cursor {
                    theme::table_selected()
                } else {
                    theme::table_row()
                };
                Line::from(Span::styled(format!(" {label}"), style))
            })
            .collect();
        frame.render_widget(Paragraph::new(lines), inner);
    }

    fn render_detail(frame: &mut Frame, area: Rect, p: &Product) {
        let block = Block::default()
            .title(format!(" #{} {} ", p.id, p.name))
            .title_style(theme::title_style())
            .borders(Borders::TOP)
            .border_style(theme::border_default());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let field = |label: &'static str, value: String| {
            Line::from(vec![
                Span::styled(format!("{label:<12}"), theme::key_hint()),
                Span::styled(value, theme::table_row()),
            ])
        };
        let opt = |v: Option<&String>| v.cloned().unwrap_or_else(|| "─".into());

        let mut lines = vec![
            field("Brand", p.brand.clone()),
            field("Category", p.category_name().to_owned()),
            field(
                "Price",
                format!(
                    "{}  (list {}, cash {})",
                    p.price,
                    opt(p.price_list.as_ref()),
                    opt(p.price_cash.as_ref())
                ),
            ),
            field("Stock", format!("{} ({})", p.stock, p.stock_level())),
            field("Model", opt(p.model_code.as_ref())),
            field("Warranty", opt(p.warranty_code.as_ref())),
            field("Campaign", opt(p.campaign_tag.as_ref())),
        ];
        if !p.description.is_empty() {
            lines.push(Line::from(Span::styled(
                p.description.clone(),
                theme::tab_inactive(),
            )));
        }
        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner);
    }

    fn render_footer(&self, frame: &mut Frame, area: Rect) {
        let derived = self.view.derived();
        let position = if derived.total_pages == 0 {
            "no matching rows".to_owned()
        } else {
            format!(
                "page {}/{} · {} matching",
                derived.page,
                derived.total_pages,
                derived.filtered.len()
            )
        };

        let mut spans = vec![Span::styled(format!(" {position}"), theme::tab_inactive())];
        let selected = self.view.selection().len();
        if selected > 0 {
            spans.push(Span::styled(
                format!(" · {selected} selected"),
                theme::row_marked(),
            ));
        }
        spans.push(Span::styled("  │ ", theme::key_hint()));
        for (key, hint) in [
            ("/", "search "),
            ("Tab", "stock "),
            ("1-6", "sort "),
            ("v", "view "),
            ("␣", "select "),
            ("a", "page "),
            ("⏎", "menu "),
            ("d", "delete "),
            ("r", "refresh"),
        ] {
            spans.push(Span::styled(format!("{key} "), theme::key_hint_key()));
            spans.push(Span::styled(hint, theme::key_hint()));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}

impl Component for ProductsScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if self.search_active {
            self.handle_search_key(key);
            return Ok(None);
        }
        if self.view.active_menu().is_some() {
            return Ok(self.handle_menu_key(key));
        }
        Ok(self.handle_table_key(key))
    }

    fn handle_paste(&mut self, text: &str) {
        if self.search_active {
            self.paste_into_search(text);
        }
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::ProductsUpdated(products) => {
                self.view.replace_entities(Arc::clone(products));
                self.clamp_cursor();
            }
            Action::FetchStarted => self.loading = true,
            // A failed fetch keeps the previous rows in place
            Action::FetchStatusChanged(_) => self.loading = false,
            Action::DeleteFinished(_) => self.view.clear_selection(),
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let title = if self.loading {
            " Products · refreshing… "
        } else {
            " Products "
        };
        let block = Block::default()
            .title(title)
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(if self.focused {
                theme::border_focused()
            } else {
                theme::border_default()
            });
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let detail = self.detail_product();
        let detail_height = if detail.is_some() { 10 } else { 0 };

        let [search_area, tabs_area, table_area, detail_area, footer_area] =
            Layout::vertical([
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Min(3),
                Constraint::Length(detail_height),
                Constraint::Length(1),
            ])
            .areas(inner);

        self.render_search_line(frame, search_area);

        let mut tabs = Vec::with_capacity(STOCK_LABELS.len() + 1);
        tabs.push(Span::raw(" "));
        tabs.extend(sub_tabs::render_sub_tabs(&STOCK_LABELS, self.stock_index()).spans);
        frame.render_widget(Paragraph::new(Line::from(tabs)), tabs_area);

        let state = self.render_table(frame, table_area);

        if let Some(ref p) = detail {
            Self::render_detail(frame, detail_area, p);
        }

        self.render_footer(frame, footer_area);

        if let Some(id) = self.view.active_menu() {
            self.render_menu(frame, table_area, &state, id);
        }
    }

    fn captures_input(&self) -> bool {
        self.search_active
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn id(&self) -> &'static str {
        "products"
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use pretty_assertions::assert_eq;
    use ratatui::{Terminal, backend::TestBackend};
    use sirs_core::FetchStatus;

    use super::*;

    fn product(id: u64, name: &str, price: &str, stock: &str) -> Arc<Product> {
        Arc::new(Product {
            id: EntityId::new(id),
            name: name.into(),
            brand: "Beko".into(),
            description: String::new(),
            price: price.into(),
            stock: stock.into(),
            category: None,
            model_code: None,
            warranty_code: None,
            price_list: None,
            price_cash: None,
            campaign_tag: None,
            image: None,
        })
    }

    fn catalog() -> Arc<Vec<Arc<Product>>> {
        Arc::new(vec![
            product(1, "Oven", "300", "0"),
            product(2, "Fridge", "900", "15"),
            product(3, "Kettle", "40", "4"),
            product(4, "Dishwasher", "650", "22"),
            product(5, "Toaster", "25", "7"),
        ])
    }

    fn screen(page_size: usize) -> ProductsScreen {
        let mut s = ProductsScreen::new(page_size);
        s.update(&Action::ProductsUpdated(catalog())).expect("update");
        s
    }

    fn press(s: &mut ProductsScreen, code: KeyCode) -> Option<Action> {
        s.handle_key_event(KeyEvent::new(code, KeyModifiers::NONE))
            .expect("key")
    }

    fn type_text(s: &mut ProductsScreen, text: &str) {
        for c in text.chars() {
            press(s, KeyCode::Char(c));
        }
    }

    fn ids(s: &ProductsScreen) -> Vec<u64> {
        s.view.derived().rows.iter().map(|p| p.id.get()).collect()
    }

    #[test]
    fn typing_filters_live_and_esc_clears() {
        let mut s = screen(25);
        press(&mut s, KeyCode::Char('/'));
        assert!(s.captures_input());

        type_text(&mut s, "ke");
        assert_eq!(ids(&s), vec![3]);
        // global shortcut letters land in the box while searching
        type_text(&mut s, "q");
        assert_eq!(s.search.value(), "keq");

        press(&mut s, KeyCode::Esc);
        assert!(!s.captures_input());
        assert_eq!(s.search.value(), "");
        assert_eq!(ids(&s), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn pasted_text_lands_in_the_search_box_on_one_line() {
        let mut s = screen(25);
        s.handle_paste("fridge");
        assert_eq!(s.search.value(), "");

        press(&mut s, KeyCode::Char('/'));
        s.handle_paste("Dish\nwasher");
        assert_eq!(s.search.value(), "Dishwasher");
        assert_eq!(ids(&s), vec![4]);
    }

    #[test]
    fn enter_keeps_the_search() {
        let mut s = screen(25);
        press(&mut s, KeyCode::Char('/'));
        type_text(&mut s, "oven");
        press(&mut s, KeyCode::Enter);
        assert!(!s.captures_input());
        assert_eq!(ids(&s), vec![1]);
    }

    #[test]
    fn tab_cycles_stock_filter() {
        let mut s = screen(25);
        press(&mut s, KeyCode::Tab);
        assert_eq!(s.view.criteria().stock, StockFilter::InStock);
        assert_eq!(ids(&s), vec![2, 3, 4, 5]);

        press(&mut s, KeyCode::Tab);
        assert_eq!(ids(&s), vec![1]);

        press(&mut s, KeyCode::BackTab);
        press(&mut s, KeyCode::BackTab);
        assert_eq!(s.view.criteria().stock, StockFilter::All);
    }

    #[test]
    fn number_keys_sort_and_repeat_reverses() {
        let mut s = screen(25);
        press(&mut s, KeyCode::Char('5'));
        assert_eq!(ids(&s), vec![5, 3, 1, 4, 2]);
        press(&mut s, KeyCode::Char('5'));
        assert_eq!(ids(&s), vec![2, 4, 1, 3, 5]);
        assert_eq!(s.view.sort().direction, SortDirection::Desc);
    }

    #[test]
    fn paging_resets_cursor() {
        let mut s = screen(2);
        press(&mut s, KeyCode::Char('j'));
        press(&mut s, KeyCode::Char(']'));
        assert_eq!(s.view.derived().page, 2);
        assert_eq!(ids(&s), vec![3, 4]);
        assert_eq!(s.table_state.selected(), Some(0));

        press(&mut s, KeyCode::Char(']'));
        press(&mut s, KeyCode::Char(']'));
        assert_eq!(s.view.derived().page, 3);

        press(&mut s, KeyCode::Char('['));
        assert_eq!(s.view.derived().page, 2);
    }

    #[test]
    fn page_size_keys_resize_the_window() {
        let mut s = screen(5);
        press(&mut s, KeyCode::Char('-'));
        assert_eq!(s.view.window().page_size(), 5);
        press(&mut s, KeyCode::Char('+'));
        assert_eq!(s.view.window().page_size(), 10);
    }

    #[test]
    fn space_and_select_all_feed_bulk_delete() {
        let mut s = screen(2);
        press(&mut s, KeyCode::Char(' '));
        press(&mut s, KeyCode::Char('j'));
        press(&mut s, KeyCode::Char(' '));
        assert_eq!(s.view.selection().len(), 2);

        match press(&mut s, KeyCode::Char('d')) {
            Some(Action::RequestDelete(ids)) => {
                assert_eq!(ids, vec![EntityId::new(1), EntityId::new(2)]);
            }
            other => panic!("unexpected {other:?}"),
        }

        // every row of the page is selected, so select-all clears
        press(&mut s, KeyCode::Char('a'));
        assert!(s.view.selection().is_empty());

        press(&mut s, KeyCode::Char(']'));
        press(&mut s, KeyCode::Char('a'));
        assert_eq!(
            s.view.selection().ids(),
            vec![EntityId::new(3), EntityId::new(4)]
        );
    }

    #[test]
    fn finished_bulk_delete_clears_selection() {
        let mut s = screen(25);
        press(&mut s, KeyCode::Char('a'));
        assert_eq!(s.view.selection().len(), 5);
        s.update(&Action::DeleteFinished(sirs_core::BulkOutcome::default()))
            .expect("update");
        assert!(s.view.selection().is_empty());
    }

    #[test]
    fn delete_without_selection_targets_cursor_row() {
        let mut s = screen(25);
        press(&mut s, KeyCode::Down);
        press(&mut s, KeyCode::Down);
        match press(&mut s, KeyCode::Delete) {
            Some(Action::RequestDelete(ids)) => assert_eq!(ids, vec![EntityId::new(3)]),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn row_menu_opens_navigates_and_closes() {
        let mut s = screen(25);
        press(&mut s, KeyCode::Enter);
        assert_eq!(s.view.active_menu(), Some(EntityId::new(1)));

        // menu owns j/k while open
        press(&mut s, KeyCode::Char('j'));
        press(&mut s, KeyCode::Enter);
        assert_eq!(s.view.active_menu(), None);
        assert!(s.view.selection().contains(EntityId::new(1)));
        assert_eq!(s.table_state.selected(), Some(0));

        press(&mut s, KeyCode::Enter);
        press(&mut s, KeyCode::Char('j'));
        press(&mut s, KeyCode::Char('j'));
        match press(&mut s, KeyCode::Enter) {
            Some(Action::RequestDelete(ids)) => assert_eq!(ids, vec![EntityId::new(1)]),
            other => panic!("unexpected {other:?}"),
        }

        press(&mut s, KeyCode::Enter);
        press(&mut s, KeyCode::Esc);
        assert_eq!(s.view.active_menu(), None);
    }

    #[test]
    fn details_entry_opens_the_detail_pane() {
        let mut s = screen(25);
        press(&mut s, KeyCode::Enter);
        press(&mut s, KeyCode::Enter);
        assert_eq!(s.detail, Some(EntityId::new(1)));
        press(&mut s, KeyCode::Esc);
        assert_eq!(s.detail, None);
    }

    #[test]
    fn saved_views_cycle_and_reset_search() {
        let mut s = screen(25);
        press(&mut s, KeyCode::Char('/'));
        type_text(&mut s, "o");
        press(&mut s, KeyCode::Enter);

        press(&mut s, KeyCode::Char('v'));
        assert_eq!(s.view.saved_view(), Some(SavedView::LowStock));
        assert_eq!(s.search.value(), "");
        assert_eq!(ids(&s), vec![3, 5]);

        press(&mut s, KeyCode::Char('v'));
        press(&mut s, KeyCode::Char('v'));
        assert_eq!(s.view.saved_view(), Some(SavedView::Recent));
        assert_eq!(ids(&s), vec![5, 4, 3, 2, 1]);

        press(&mut s, KeyCode::Char('v'));
        assert_eq!(s.view.saved_view(), None);
        assert_eq!(s.view.sort(), SortSpec::default());
        assert_eq!(ids(&s), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn failed_fetch_keeps_stale_rows() {
        let mut s = screen(25);
        s.update(&Action::FetchStarted).expect("update");
        assert!(s.loading);
        s.update(&Action::FetchStatusChanged(FetchStatus::Failed {
            message: "connection refused".into(),
            at: Utc::now(),
        }))
        .expect("update");
        assert!(!s.loading);
        assert_eq!(ids(&s), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn shrinking_snapshot_clamps_cursor() {
        let mut s = screen(25);
        press(&mut s, KeyCode::Char('G'));
        assert_eq!(s.table_state.selected(), Some(4));

        let smaller = Arc::new(vec![product(1, "Oven", "300", "0")]);
        s.update(&Action::ProductsUpdated(smaller)).expect("update");
        assert_eq!(s.table_state.selected(), Some(0));
    }

    #[test]
    fn renders_table_and_footer() {
        let mut s = screen(25);
        press(&mut s, KeyCode::Char(' '));
        let mut terminal = Terminal::new(TestBackend::new(120, 20)).expect("terminal");
        terminal.draw(|f| s.render(f, f.area())).expect("draw");

        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(ratatui::buffer::Cell::symbol)
            .collect();
        assert!(text.contains("Products"));
        assert!(text.contains("Dishwasher"));
        assert!(text.contains("page 1/1"));
        assert!(text.contains("1 selected"));
    }
}
