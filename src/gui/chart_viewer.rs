//! Chart Viewer Widget
//! Central scrollable panel: summary cards, the five dashboard charts and
//! the raw rows of the selected period.

use crate::charts::ChartPlotter;
use crate::data::MonthKey;
use crate::format::{format_count, format_currency};
use crate::pipeline::Snapshot;
use crate::stats::{Extremal, Ranking};
use egui::{Color32, RichText, ScrollArea};

const CHART_SPACING: f32 = 15.0;
const CHART_HEIGHT: f32 = 320.0;
const CARD_WIDTH: f32 = 230.0;
const TABLE_HEIGHT: f32 = 360.0;
const ROW_HEIGHT: f32 = 20.0;

const NO_DATA: &str = "—";

/// How a ranking key is named on a card.
pub trait CardLabel {
    fn card_label(&self) -> String;
}

impl CardLabel for String {
    fn card_label(&self) -> String {
        self.clone()
    }
}

impl CardLabel for MonthKey {
    fn card_label(&self) -> String {
        self.short_name().to_string()
    }
}

/// One summary card: a title, the headline value and a caption.
#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    pub title: &'static str,
    pub value: String,
    pub caption: String,
}

impl Card {
    fn new(title: &'static str, value: String, caption: impl Into<String>) -> Self {
        Self {
            title,
            value,
            caption: caption.into(),
        }
    }

    /// Card for one side of a ranking. `NoData` renders as a dash.
    fn extremal<K: CardLabel>(
        title: &'static str,
        extremal: &Extremal<K>,
        fmt: impl Fn(f64) -> String,
    ) -> Self {
        match extremal {
            Extremal::Found { key, value } => Self::new(title, key.card_label(), fmt(*value)),
            Extremal::NoData => Self::new(title, NO_DATA.to_string(), "no data"),
        }
    }

    fn ranking<K: CardLabel>(
        top: &'static str,
        bottom: &'static str,
        ranking: &Ranking<K>,
        fmt: impl Fn(f64) -> String + Copy,
    ) -> [Self; 2] {
        [
            Self::extremal(top, &ranking.top, fmt),
            Self::extremal(bottom, &ranking.bottom, fmt),
        ]
    }
}

fn units(value: f64) -> String {
    format!("{} units", format_count(value.round() as i64))
}

fn rating(value: f64) -> String {
    format!("{value:.2} ★")
}

/// Headline totals of the selected period.
pub fn headline_cards(snapshot: &Snapshot) -> Vec<Card> {
    let sel = &snapshot.metrics.selection;
    vec![
        Card::new("Revenue", format_currency(sel.total_revenue), "selected period"),
        Card::new("Units Sold", format_count(sel.total_quantity), "selected period"),
        Card::new("Orders", format_count(sel.order_count as i64), "selected period"),
    ]
}

/// Best and worst month over the whole dataset.
pub fn year_cards(snapshot: &Snapshot) -> Vec<Card> {
    let year = &snapshot.metrics.year;
    let mut cards = Vec::with_capacity(4);
    cards.extend(Card::ranking(
        "Best Month (Revenue)",
        "Worst Month (Revenue)",
        &year.month_by_revenue,
        format_currency,
    ));
    cards.extend(Card::ranking(
        "Best Month (Units)",
        "Worst Month (Units)",
        &year.month_by_quantity,
        units,
    ));
    cards
}

/// Top and bottom entities of the selected period.
pub fn ranking_cards(snapshot: &Snapshot) -> Vec<Card> {
    let sel = &snapshot.metrics.selection;
    let mut cards = Vec::with_capacity(12);
    cards.extend(Card::ranking(
        "Most Sold Product",
        "Least Sold Product",
        &sel.product_by_quantity,
        units,
    ));
    cards.extend(Card::ranking(
        "Top Product (Revenue)",
        "Bottom Product (Revenue)",
        &sel.product_by_revenue,
        format_currency,
    ));
    cards.extend(Card::ranking(
        "Best Rated Product",
        "Worst Rated Product",
        &sel.product_by_rating,
        rating,
    ));
    cards.extend(Card::ranking(
        "Top Brand (Units)",
        "Bottom Brand (Units)",
        &sel.brand_by_quantity,
        units,
    ));
    cards.extend(Card::ranking(
        "Top City (Units)",
        "Bottom City (Units)",
        &sel.city_by_quantity,
        units,
    ));
    cards.extend(Card::ranking(
        "Top City (Revenue)",
        "Bottom City (Revenue)",
        &sel.city_by_revenue,
        format_currency,
    ));
    cards
}

/// Scrollable dashboard area.
#[derive(Default)]
pub struct ChartViewer {
    show_table: bool,
}

impl ChartViewer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show(&mut self, ui: &mut egui::Ui, snapshot: Option<&Snapshot>) {
        let Some(snapshot) = snapshot else {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("No Data").size(20.0));
            });
            return;
        };

        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.heading(format!(
                    "Sales Overview - {}",
                    snapshot.metrics.period.label()
                ));
                ui.add_space(8.0);
                Self::draw_cards(ui, &headline_cards(snapshot), Color32::from_rgb(52, 152, 219));

                ui.add_space(CHART_SPACING);
                Self::draw_charts(ui, snapshot);

                ui.add_space(CHART_SPACING);
                ui.label(RichText::new("Strategic Summary").size(18.0).strong());
                ui.add_space(6.0);
                ui.label(RichText::new("Whole year").size(13.0).color(Color32::GRAY));
                Self::draw_cards(ui, &year_cards(snapshot), Color32::from_rgb(100, 149, 237));
                ui.add_space(6.0);
                ui.label(
                    RichText::new(snapshot.metrics.period.label())
                        .size(13.0)
                        .color(Color32::GRAY),
                );
                Self::draw_cards(ui, &ranking_cards(snapshot), Color32::from_rgb(40, 167, 69));

                ui.add_space(CHART_SPACING);
                ui.checkbox(
                    &mut self.show_table,
                    format!("Show raw data ({} rows)", snapshot.view.height()),
                );
                if self.show_table {
                    Self::draw_table(ui, snapshot);
                }
            });
    }

    fn draw_cards(ui: &mut egui::Ui, cards: &[Card], accent: Color32) {
        ui.horizontal_wrapped(|ui| {
            for card in cards {
                egui::Frame::none()
                    .rounding(8.0)
                    .stroke(egui::Stroke::new(1.5, accent))
                    .fill(ui.visuals().widgets.noninteractive.bg_fill)
                    .inner_margin(10.0)
                    .show(ui, |ui| {
                        ui.set_width(CARD_WIDTH);
                        ui.vertical(|ui| {
                            ui.label(RichText::new(card.title).size(12.0).color(Color32::GRAY));
                            ui.label(RichText::new(&card.value).size(18.0).strong());
                            ui.label(RichText::new(&card.caption).size(11.0).color(accent));
                        });
                    });
                ui.add_space(6.0);
            }
        });
    }

    fn chart_card(ui: &mut egui::Ui, title: &str, draw: impl FnOnce(&mut egui::Ui)) {
        egui::Frame::none()
            .rounding(8.0)
            .stroke(egui::Stroke::new(1.0, Color32::from_gray(80)))
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .inner_margin(10.0)
            .show(ui, |ui| {
                ui.label(RichText::new(title).size(14.0).strong());
                ui.add_space(4.0);
                draw(ui);
            });
    }

    fn draw_charts(ui: &mut egui::Ui, snapshot: &Snapshot) {
        let sel = &snapshot.metrics.selection;

        ui.columns(2, |cols| {
            Self::chart_card(&mut cols[0], "Daily Revenue", |ui| {
                ChartPlotter::draw_daily_revenue(ui, &sel.daily_revenue, CHART_HEIGHT)
            });
            Self::chart_card(&mut cols[1], "Revenue by Category and City", |ui| {
                ChartPlotter::draw_category_revenue(ui, &sel.category_city_revenue, CHART_HEIGHT)
            });
        });
        ui.add_space(CHART_SPACING);
        ui.columns(3, |cols| {
            Self::chart_card(&mut cols[0], "Sales per Month", |ui| {
                ChartPlotter::draw_monthly_quantity(ui, &sel.monthly_quantity, CHART_HEIGHT)
            });
            Self::chart_card(&mut cols[1], "Monthly Growth (%)", |ui| {
                ChartPlotter::draw_growth(ui, &sel.monthly_growth, CHART_HEIGHT)
            });
            Self::chart_card(&mut cols[2], "Rating by Product", |ui| {
                ChartPlotter::draw_product_rating(ui, &sel.product_rating, CHART_HEIGHT)
            });
        });
    }

    /// Raw rows of the view; only the visible slice is materialized.
    fn draw_table(ui: &mut egui::Ui, snapshot: &Snapshot) {
        let view = &snapshot.view;
        let headers = view.column_names();

        ScrollArea::both()
            .id_salt("raw_rows")
            .max_height(TABLE_HEIGHT)
            .show_rows(ui, ROW_HEIGHT, view.height(), |ui, row_range| {
                egui::Grid::new("raw_rows_grid")
                    .striped(true)
                    .min_col_width(90.0)
                    .show(ui, |ui| {
                        for header in &headers {
                            ui.label(RichText::new(header).strong());
                        }
                        ui.end_row();
                        for row in row_range {
                            for cell in view.row_cells(row) {
                                ui.label(cell);
                            }
                            ui.end_row();
                        }
                    });
            });
    }
}
