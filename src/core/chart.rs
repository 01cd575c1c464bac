use crate::domain::model::{AnalyticsReport, CampaignPanel, CampaignReport, Metric};
use plotly::common::{Anchor, Mode, Orientation, Title};
use plotly::layout::{Annotation, Axis, GridPattern, Layout, LayoutGrid};
use plotly::{Bar, Plot, Scatter};

pub const CHART_DIV_ID: &str = "dashboard-chart";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Axis references for the n-th subplot (1-based): `x`/`y`, then `x2`/`y2`, ...
fn axis_refs(index: usize) -> (String, String) {
    if index <= 1 {
        ("x".to_string(), "y".to_string())
    } else {
        (format!("x{}", index), format!("y{}", index))
    }
}

fn with_axes(layout: Layout, index: usize, x: Axis, y: Axis) -> Layout {
    match index {
        1 => layout.x_axis(x).y_axis(y),
        2 => layout.x_axis2(x).y_axis2(y),
        3 => layout.x_axis3(x).y_axis3(y),
        4 => layout.x_axis4(x).y_axis4(y),
        5 => layout.x_axis5(x).y_axis5(y),
        _ => layout,
    }
}

/// Centered title above the n-th subplot, positioned in that subplot's axis domain.
fn subplot_title(index: usize, text: &str) -> Annotation {
    let (x_ref, y_ref) = axis_refs(index);
    Annotation::new()
        .text(text)
        .x_ref(&format!("{} domain", x_ref))
        .y_ref(&format!("{} domain", y_ref))
        .x(0.5)
        .y(1.0)
        .x_anchor(Anchor::Center)
        .y_anchor(Anchor::Bottom)
        .show_arrow(false)
}

/// One stacked line panel per metric, y axes starting at zero.
pub fn analytics_figure(report: &AnalyticsReport) -> Plot {
    let mut plot = Plot::new();
    let dates: Vec<String> = report
        .rows
        .iter()
        .map(|row| row.date.format(DATE_FORMAT).to_string())
        .collect();

    let mut layout = Layout::new()
        .title(Title::with_text("Google Analytics Data"))
        .height(1500)
        .width(1200)
        .grid(
            LayoutGrid::new()
                .rows(Metric::ALL.len())
                .columns(1)
                .pattern(GridPattern::Independent),
        );

    for (offset, metric) in Metric::ALL.iter().enumerate() {
        let index = offset + 1;
        let (x_ref, y_ref) = axis_refs(index);
        let values: Vec<i64> = report.rows.iter().map(|row| row.metric(*metric)).collect();

        plot.add_trace(
            Scatter::new(dates.clone(), values)
                .mode(Mode::LinesMarkers)
                .name(metric.label())
                .x_axis(&x_ref)
                .y_axis(&y_ref),
        );

        let upper = report.max(*metric) as f64 + 5.0;
        layout = with_axes(
            layout,
            index,
            Axis::new(),
            Axis::new()
                .title(Title::with_text(metric.label()))
                .range(vec![0.0, upper]),
        );
    }

    let titles = Metric::ALL
        .iter()
        .enumerate()
        .map(|(offset, metric)| subplot_title(offset + 1, metric.label()))
        .collect();
    plot.set_layout(layout.annotations(titles));
    plot
}

/// 2x2 grid: impressions over time, then audiences, platforms and genres.
pub fn campaign_figure(report: &CampaignReport) -> Plot {
    let mut plot = Plot::new();
    let mut layout = Layout::new()
        .title(Title::with_text("Campaign Data Visualization"))
        .height(1050)
        .width(1680)
        .grid(
            LayoutGrid::new()
                .rows(2)
                .columns(2)
                .pattern(GridPattern::Independent),
        );

    for (offset, panel) in CampaignPanel::ALL.iter().enumerate() {
        let index = offset + 1;
        let (x_ref, y_ref) = axis_refs(index);

        match panel {
            CampaignPanel::TotalImpressions => {
                if !report.impressions_over_time.is_empty() {
                    let dates: Vec<String> = report
                        .impressions_over_time
                        .iter()
                        .map(|d| d.start_date.format(DATE_FORMAT).to_string())
                        .collect();
                    let counts: Vec<i64> = report
                        .impressions_over_time
                        .iter()
                        .map(|d| d.impressions)
                        .collect();
                    plot.add_trace(
                        Scatter::new(dates, counts)
                            .mode(Mode::LinesMarkers)
                            .name("Total Impressions")
                            .x_axis(&x_ref)
                            .y_axis(&y_ref),
                    );
                }
            }
            CampaignPanel::Audiences => {
                let rows = report.categories(*panel);
                if !rows.is_empty() {
                    let labels: Vec<String> = rows.iter().map(|r| r.label.clone()).collect();
                    let counts: Vec<i64> = rows.iter().map(|r| r.impressions).collect();
                    plot.add_trace(
                        Bar::new(counts, labels)
                            .orientation(Orientation::Horizontal)
                            .name(panel.title())
                            .x_axis(&x_ref)
                            .y_axis(&y_ref),
                    );
                }
            }
            CampaignPanel::Platforms | CampaignPanel::ContentGenres => {
                let rows = report.categories(*panel);
                if !rows.is_empty() {
                    let labels: Vec<String> = rows.iter().map(|r| r.label.clone()).collect();
                    let counts: Vec<i64> = rows.iter().map(|r| r.impressions).collect();
                    plot.add_trace(
                        Bar::new(labels, counts)
                            .name(panel.title())
                            .x_axis(&x_ref)
                            .y_axis(&y_ref),
                    );
                }
            }
        }

        layout = with_axes(
            layout,
            index,
            Axis::new(),
            Axis::new(),
        );
    }

    let titles = CampaignPanel::ALL
        .iter()
        .enumerate()
        .map(|(offset, panel)| subplot_title(offset + 1, panel.title()))
        .collect();
    plot.set_layout(layout.annotations(titles));
    plot
}

/// Standalone page for the output file, and a div for embedding.
pub fn render(plot: &Plot) -> (String, String) {
    (plot.to_html(), plot.to_inline_html(Some(CHART_DIV_ID)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{AnalyticsRow, CategoryImpressions, DailyImpressions};
    use chrono::NaiveDate;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    #[test]
    fn test_axis_refs() {
        assert_eq!(axis_refs(1), ("x".to_string(), "y".to_string()));
        assert_eq!(axis_refs(4), ("x4".to_string(), "y4".to_string()));
    }

    #[test]
    fn test_analytics_figure_has_a_trace_per_metric() {
        let report = AnalyticsReport {
            rows: vec![AnalyticsRow {
                date: day(1),
                new_users: 3,
                active_users: 7,
                event_count: 40,
                total_users: 9,
                sessions: 12,
            }],
        };

        let json = analytics_figure(&report).to_json();

        for metric in Metric::ALL {
            assert!(json.contains(metric.label()), "missing {}", metric.label());
        }
        assert!(json.contains("2024-05-01"));
        assert!(json.contains("Google Analytics Data"));
    }

    #[test]
    fn test_campaign_figure_skips_empty_panels() {
        let report = CampaignReport {
            impressions_over_time: vec![DailyImpressions {
                start_date: day(6),
                impressions: 1234,
            }],
            platforms: vec![CategoryImpressions {
                label: "Living Room".to_string(),
                impressions: 99,
            }],
            ..Default::default()
        };

        let json = campaign_figure(&report).to_json();

        assert!(json.contains("Total Impressions"));
        assert!(json.contains("Living Room"));
        assert!(json.contains(r#""name":"Impressions by Platforms""#));
        assert!(!json.contains(r#""name":"Impressions by Audiences""#));
    }

    #[test]
    fn test_subplot_titles_sit_above_their_panels() {
        let figure: serde_json::Value =
            serde_json::from_str(&campaign_figure(&CampaignReport::default()).to_json()).unwrap();
        let annotations = figure["layout"]["annotations"].as_array().unwrap();

        assert_eq!(annotations.len(), CampaignPanel::ALL.len());
        assert_eq!(annotations[0]["text"], "Total Impressions Over Time");
        assert_eq!(annotations[2]["text"], "Impressions by Platforms");
        assert_eq!(annotations[2]["xref"], "x3 domain");
        assert_eq!(annotations[2]["yref"], "y3 domain");
    }

    #[test]
    fn test_analytics_date_axes_are_untitled() {
        let report = AnalyticsReport {
            rows: vec![AnalyticsRow {
                date: day(1),
                new_users: 1,
                active_users: 1,
                event_count: 1,
                total_users: 1,
                sessions: 1,
            }],
        };
        let figure: serde_json::Value =
            serde_json::from_str(&analytics_figure(&report).to_json()).unwrap();
        let layout = &figure["layout"];

        assert!(layout["xaxis"].get("title").is_none());
        assert!(layout["xaxis5"].get("title").is_none());
        assert_eq!(layout["yaxis2"]["title"]["text"], "Returning Users");
        assert_eq!(layout["annotations"][4]["text"], "Sessions");
    }

    #[test]
    fn test_render_embeds_div_id() {
        let (page, inline) = render(&campaign_figure(&CampaignReport::default()));
        assert!(page.contains("<html"));
        assert!(inline.contains(CHART_DIV_ID));
    }
}
