use comfy_table::{Attribute, Cell, CellAlignment, Color, Table, modifiers, presets};

use crate::{
    core::{
        hour::Hour,
        price_table::{Day, PriceTable, TableState},
        thresholds::Thresholds,
    },
    quantity::price::KilowattHourPrice,
};

/// Render both days side by side, coloring the prices against the day's own percentiles.
pub fn build_price_table(price_table: &PriceTable, thresholds: &Thresholds) -> Table {
    let has_tomorrow = price_table.state() == TableState::TodayAndTomorrow;
    let days: &[Day] = if has_tomorrow { &[Day::Today, Day::Tomorrow] } else { &[Day::Today] };
    let bounds = days
        .iter()
        .map(|day| {
            (
                price_table.percentile(*day, thresholds.low_price_percentile),
                price_table.percentile(*day, thresholds.high_price_percentile),
            )
        })
        .collect::<Vec<_>>();

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED).apply_modifier(modifiers::UTF8_ROUND_CORNERS);
    table.enforce_styling();
    let mut header = vec![Cell::new("Hour")];
    header.extend(days.iter().map(|day| Cell::new(day).add_attribute(Attribute::Bold)));
    table.set_header(header);

    for hour in Hour::all() {
        let mut row = vec![Cell::new(hour).add_attribute(Attribute::Dim)];
        for (day, (low, high)) in days.iter().zip(&bounds) {
            let price = price_table.row(*day)[hour.index()];
            row.push(
                Cell::new(price)
                    .set_alignment(CellAlignment::Right)
                    .fg(price_color(price, *low, *high)),
            );
        }
        table.add_row(row);
    }

    let mut footer = vec![Cell::new("Percentiles").add_attribute(Attribute::Dim)];
    footer.extend(bounds.iter().map(|(low, high)| {
        Cell::new(format!("{low} … {high}")).set_alignment(CellAlignment::Right)
    }));
    table.add_row(footer);
    table
}

fn price_color(price: KilowattHourPrice, low: KilowattHourPrice, high: KilowattHourPrice) -> Color {
    if price < low {
        Color::Green
    } else if price > high {
        Color::Red
    } else {
        Color::Reset
    }
}
