//! SVG contour figures
//!
//! One figure per matched pair, two stacked panels:
//!
//! ```text
//! ┌──────────── Event {i} Data from: {stem} ────────────┐
//! │ Stereo A Frequency (MHz)                     ┌──┐   │
//! │   ▒▒▓▓██▓▓▒▒  power over (time, frequency)   │  │   │
//! │ Stereo A Time (s)                            └──┘   │
//! ├─────────────────────────────────────────────────────┤
//! │ Stereo B ...                                        │
//! └─────────────────────────────────────────────────────┘
//! ```

use std::path::{Path, PathBuf};

use log::debug;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::FontTransform;
use stereo_core::{
    events::EventSlice, spectrogram::FrequencyVector, MatchedEventPair, PowerStats, Spacecraft,
};

use crate::{
    scale::{bounds, cell_edges, ColorScale},
    RenderError, RenderResult, RenderStats, Renderer,
};

const FIGURE_SIZE: (u32, u32) = (1024, 900);
const COLOR_BAR_WIDTH: u32 = 110;

fn backend<E: std::fmt::Display>(err: E) -> RenderError {
    RenderError::Backend(err.to_string())
}

/// File name of the figure for match `index`
pub fn figure_name(index: usize) -> String {
    format!("event_{:03}.svg", index)
}

/// Writes filled-contour SVG figures into a directory
#[derive(Debug, Clone)]
pub struct ContourRenderer {
    out_dir: PathBuf,
    stats: RenderStats,
}

impl ContourRenderer {
    /// Renderer writing into `out_dir`
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
            stats: RenderStats::default(),
        }
    }

    /// Draw one matched pair into `path`
    #[allow(clippy::too_many_arguments)]
    pub fn render_pair(
        &self,
        pair: &MatchedEventPair,
        freq_a: &FrequencyVector,
        freq_b: &FrequencyVector,
        stats: PowerStats,
        index: usize,
        source_name: &str,
        path: &Path,
    ) -> RenderResult<()> {
        for (spacecraft, slice, frequency) in
            [(Spacecraft::A, &pair.a, freq_a), (Spacecraft::B, &pair.b, freq_b)]
        {
            if slice.is_empty() || frequency.is_empty() {
                return Err(RenderError::EmptySlice { index, spacecraft });
            }
        }

        let scale = ColorScale::from_stats(stats);
        let title = format!("Event {} Data from: {}", index, source_name);

        let root = SVGBackend::new(path, FIGURE_SIZE).into_drawing_area();
        root.fill(&WHITE).map_err(backend)?;
        let root = root
            .titled(&title, ("sans-serif", 24).into_font())
            .map_err(backend)?;

        let panels = root.split_evenly((2, 1));
        let panel = Panel { index, scale: &scale };
        panel.draw(&panels[0], Spacecraft::A, &pair.a, freq_a)?;
        panel.draw(&panels[1], Spacecraft::B, &pair.b, freq_b)?;

        root.present().map_err(backend)?;
        Ok(())
    }
}

impl Renderer for ContourRenderer {
    type Error = RenderError;

    fn render(
        &mut self,
        index: usize,
        pair: &MatchedEventPair,
        freq_a: &FrequencyVector,
        freq_b: &FrequencyVector,
        stats: PowerStats,
        source_name: &str,
    ) -> RenderResult<PathBuf> {
        let path = self.out_dir.join(figure_name(index));
        match self.render_pair(pair, freq_a, freq_b, stats, index, source_name, &path) {
            Ok(()) => {
                self.stats.figures_written += 1;
                self.stats.cells_drawn += (pair.a.power.len() + pair.b.power.len()) as u64;
                debug!("wrote {}", path.display());
                Ok(path)
            }
            Err(e) => {
                self.stats.figures_failed += 1;
                self.stats.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    fn stats(&self) -> RenderStats {
        self.stats.clone()
    }
}

/// One stacked panel of a figure
struct Panel<'a> {
    index: usize,
    scale: &'a ColorScale,
}

impl Panel<'_> {
    fn draw(
        &self,
        area: &DrawingArea<SVGBackend<'_>, Shift>,
        spacecraft: Spacecraft,
        slice: &EventSlice,
        frequency: &FrequencyVector,
    ) -> RenderResult<()> {
        let plot_width = area.dim_in_pixel().0.saturating_sub(COLOR_BAR_WIDTH);
        let (plot_area, bar_area) = area.split_horizontally(plot_width);

        let time_edges = cell_edges(&slice.time.to_vec());
        let freq_edges = cell_edges(&frequency.to_vec());
        let empty = || RenderError::EmptySlice { index: self.index, spacecraft };
        let (t0, t1) = bounds(&time_edges).ok_or_else(empty)?;
        let (f0, f1) = bounds(&freq_edges).ok_or_else(empty)?;

        let mut chart = ChartBuilder::on(&plot_area)
            .margin(15)
            .x_label_area_size(45)
            .y_label_area_size(65)
            .build_cartesian_2d(t0..t1, f0..f1)
            .map_err(backend)?;

        chart
            .configure_mesh()
            .disable_mesh()
            .x_desc(format!("Stereo {} Time (s)", spacecraft))
            .y_desc(format!("Stereo {} Frequency (MHz)", spacecraft))
            .x_label_formatter(&|v| format!("{:.0}", v))
            .y_label_formatter(&|v| format!("{:.2}", v))
            .x_label_style(("sans-serif", 14).into_font())
            .y_label_style(("sans-serif", 14).into_font())
            .draw()
            .map_err(backend)?;

        let mut cells = Vec::with_capacity(slice.power.len());
        for ((channel, sample), &power) in slice.power.indexed_iter() {
            let Some(level) = self.scale.level(power) else {
                continue;
            };
            cells.push(Rectangle::new(
                [
                    (time_edges[sample], freq_edges[channel]),
                    (time_edges[sample + 1], freq_edges[channel + 1]),
                ],
                self.scale.color(level).filled(),
            ));
        }
        chart.draw_series(cells).map_err(backend)?;

        draw_color_bar(&bar_area, self.scale)
    }
}

fn draw_color_bar(area: &DrawingArea<SVGBackend<'_>, Shift>, scale: &ColorScale) -> RenderResult<()> {
    let (_, height) = area.dim_in_pixel();
    let top = 20i32;
    let bottom = 50i32;
    let usable = (height as i32).saturating_sub(top + bottom);
    if usable < scale.levels as i32 {
        return Ok(());
    }

    let x = 10i32;
    let band = usable as f64 / scale.levels as f64;
    for level in 0..scale.levels {
        // Highest level on top
        let y_hi = top + ((scale.levels - 1 - level) as f64 * band) as i32;
        let y_lo = top + ((scale.levels - level) as f64 * band) as i32;
        area.draw(&Rectangle::new(
            [(x, y_hi), (x + 25, y_lo)],
            scale.color(level).filled(),
        ))
        .map_err(backend)?;
    }

    let style = TextStyle::from(("sans-serif", 12).into_font()).color(&BLACK);
    for (value, y) in [(scale.max, top), (scale.min, top + usable - 10)] {
        area.draw_text(&format!("{:.2e}", value), &style, (x + 30, y))
            .map_err(backend)?;
    }

    area.draw_text(
        "Power",
        &TextStyle::from(("sans-serif", 14).into_font())
            .color(&BLACK)
            .transform(FontTransform::Rotate270),
        (x + 95, top + usable / 2),
    )
    .map_err(backend)?;

    Ok(())
}
