//! Static route plots.
//!
//! [`SvgPlotter`] draws one coloured polyline per vehicle over the node
//! layout, labels every location and adds a legend. Only a [`Solution`] and
//! the locations are consumed.

use std::path::Path;

use plotters::prelude::*;
use tracing::info;

use crate::error::PlotError;
use crate::models::{Location, Solution};

type DrawResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Default chart title.
pub const DEFAULT_TITLE: &str = "Balanced Collaborative Multi-Depot Routing";

/// Space around the outermost locations, in coordinate units.
const MARGIN: f64 = 5.0;

/// Offset of a node label from its marker.
const LABEL_OFFSET: f64 = 0.3;

const PALETTE: [RGBColor; 10] = [
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
    RGBColor(214, 39, 40),
    RGBColor(148, 103, 189),
    RGBColor(140, 86, 75),
    RGBColor(227, 119, 194),
    RGBColor(127, 127, 127),
    RGBColor(188, 189, 34),
    RGBColor(23, 190, 207),
];

/// Renders a solution to a file.
pub trait SolutionPlotter {
    /// Draws the routes of `solution` over `locations` and writes the result
    /// to `path`.
    fn plot(&self, solution: &Solution, locations: &[Location], path: &Path)
        -> Result<(), PlotError>;
}

/// SVG route plot.
///
/// # Examples
///
/// ```
/// use collab_routing::models::{Location, Route, Solution};
/// use collab_routing::plot::SvgPlotter;
///
/// let depot = Location::depot(0, "Depot A", 0.0, 0.0);
/// let customer = Location::customer(1, "C1", 3.0, 4.0);
/// let route = Route::new(0, depot.clone(), vec![customer.clone()], 10.0);
/// let solution = Solution::new(vec![route]);
///
/// let svg = SvgPlotter::default().render(&solution, &[depot, customer]).unwrap();
/// assert!(svg.contains("Truck 0"));
/// ```
#[derive(Debug, Clone)]
pub struct SvgPlotter {
    width: u32,
    height: u32,
    title: String,
}

impl Default for SvgPlotter {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 800,
            title: DEFAULT_TITLE.to_string(),
        }
    }
}

impl SvgPlotter {
    /// Sets the image size in pixels.
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Sets the chart title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Renders the plot to an SVG document.
    pub fn render(&self, solution: &Solution, locations: &[Location]) -> Result<String, PlotError> {
        let mut svg = String::new();
        self.draw(&mut svg, solution, locations)
            .map_err(|e| PlotError::Draw(e.to_string()))?;
        Ok(svg)
    }

    fn draw(&self, buffer: &mut String, solution: &Solution, locations: &[Location]) -> DrawResult<()> {
        let root = SVGBackend::with_string(buffer, (self.width, self.height)).into_drawing_area();
        root.fill(&WHITE)?;

        let (x_range, y_range) = bounds(locations);
        let mut chart = ChartBuilder::on(&root)
            .caption(&self.title, ("sans-serif", 28))
            .margin(15)
            .x_label_area_size(40)
            .y_label_area_size(40)
            .build_cartesian_2d(x_range, y_range)?;
        chart
            .configure_mesh()
            .x_desc("X")
            .y_desc("Y")
            .draw()?;

        for route in solution.routes() {
            let color = PALETTE[route.vehicle_id() % PALETTE.len()];
            let points: Vec<(f64, f64)> = route.path().map(|l| (l.x(), l.y())).collect();
            chart
                .draw_series(LineSeries::new(points, color.stroke_width(2)))?
                .label(format!("Truck {}", route.vehicle_id()))
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));
        }

        chart.draw_series(locations.iter().map(|l| {
            let (size, style) = if l.is_depot() {
                (7, BLACK.filled())
            } else {
                (4, RGBColor(90, 90, 90).filled())
            };
            Circle::new((l.x(), l.y()), size, style)
        }))?;
        chart.draw_series(locations.iter().map(|l| {
            Text::new(
                l.name().to_string(),
                (l.x() + LABEL_OFFSET, l.y() + LABEL_OFFSET),
                ("sans-serif", 12).into_font(),
            )
        }))?;

        chart
            .configure_series_labels()
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .position(SeriesLabelPosition::UpperRight)
            .draw()?;

        root.present()?;
        Ok(())
    }
}

impl SolutionPlotter for SvgPlotter {
    fn plot(
        &self,
        solution: &Solution,
        locations: &[Location],
        path: &Path,
    ) -> Result<(), PlotError> {
        let svg = self.render(solution, locations)?;
        std::fs::write(path, svg)?;
        info!(path = %path.display(), routes = solution.num_routes(), "plot written");
        Ok(())
    }
}

/// Coordinate ranges covering every location plus a margin.
fn bounds(locations: &[Location]) -> (std::ops::Range<f64>, std::ops::Range<f64>) {
    let (mut min_x, mut max_x) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut min_y, mut max_y) = (f64::INFINITY, f64::NEG_INFINITY);
    for l in locations {
        min_x = min_x.min(l.x());
        max_x = max_x.max(l.x());
        min_y = min_y.min(l.y());
        max_y = max_y.max(l.y());
    }
    if locations.is_empty() {
        return (0.0..1.0, 0.0..1.0);
    }
    (
        min_x - MARGIN..max_x + MARGIN,
        min_y - MARGIN..max_y + MARGIN,
    )
}
