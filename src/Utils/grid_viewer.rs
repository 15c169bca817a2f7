//! Static heatmaps of `(nx, ny)` arrays.
//!
//! ```rust,ignore
//! let mut viewer = GridViewer::new(array, 0.0, 2.0, "PN / <PN>");
//! viewer.plot("pn.png")?;
//! viewer.update(next_array)?;
//! viewer.plot("pn.svg")?;
//! ```
//!
//! Entry `(i, j)` of the array is drawn as the rectangle of cell `(i, j)`, x to the right and
//! y upwards. Values are clamped to the display bounds before coloring; the backend is chosen
//! from the file extension (`.svg` gives SVG, anything else a bitmap).
use crate::FiniteVolume::fv_error::FvError;
use log::warn;
use nalgebra::DMatrix;
use plotters::prelude::*;
use std::error::Error;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct GridViewer {
    array: DMatrix<f64>,
    pub min_val: f64,
    pub max_val: f64,
    pub title: String,
    /// physical size of the domain along x and y
    pub extents: (f64, f64),
    pub width: u32,
    pub height: u32,
}

impl GridViewer {
    pub fn new(array: DMatrix<f64>, min_val: f64, max_val: f64, title: &str) -> Self {
        let extents = (array.nrows() as f64, array.ncols() as f64);
        Self {
            array,
            min_val,
            max_val,
            title: title.to_string(),
            extents,
            width: 800,
            height: 800,
        }
    }

    pub fn with_extents(mut self, lx: f64, ly: f64) -> Self {
        self.extents = (lx, ly);
        self
    }

    pub fn array(&self) -> &DMatrix<f64> {
        &self.array
    }

    /// replace the displayed array, which must keep its shape
    pub fn update(&mut self, array: DMatrix<f64>) -> Result<(), FvError> {
        if array.shape() != self.array.shape() {
            return Err(FvError::DimensionMismatch {
                expected: self.array.len(),
                found: array.len(),
            });
        }
        self.array = array;
        Ok(())
    }

    pub fn plot(&self, output_path: &str) -> Result<(), Box<dyn Error>> {
        if !(self.min_val < self.max_val) {
            return Err(format!(
                "display bounds must satisfy min < max, got {}..{}",
                self.min_val, self.max_val
            )
            .into());
        }
        let ext = Path::new(output_path)
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or("png");

        let size = (self.width, self.height);
        match ext {
            "svg" => self.plot_with(|| SVGBackend::new(output_path, size)),
            _ => self.plot_with(|| BitMapBackend::new(output_path, size)),
        }
    }

    /// Draws with caption and axis labels, and once more without any text when that fails
    /// (no usable system font).
    fn plot_with<DB, F>(&self, backend: F) -> Result<(), Box<dyn Error>>
    where
        DB: DrawingBackend,
        DB::ErrorType: 'static,
        F: Fn() -> DB,
    {
        match self.plot_impl(backend(), true) {
            Ok(()) => Ok(()),
            Err(e) => {
                warn!("'{}' drawn without labels: {}", self.title, e);
                self.plot_impl(backend(), false)
            }
        }
    }

    fn plot_impl<DB: DrawingBackend>(
        &self,
        backend: DB,
        labeled: bool,
    ) -> Result<(), Box<dyn Error>>
    where
        DB::ErrorType: 'static,
    {
        let (nx, ny) = self.array.shape();
        let (lx, ly) = self.extents;
        let (dx, dy) = (lx / nx as f64, ly / ny as f64);

        let root = backend.into_drawing_area();
        root.fill(&WHITE)?;

        let caption = format!("{}  [{:.2}, {:.2}]", self.title, self.min_val, self.max_val);
        let mut builder = ChartBuilder::on(&root);
        builder.margin(15);
        if labeled {
            builder
                .caption(&caption, ("sans-serif", 28).into_font())
                .x_label_area_size(40)
                .y_label_area_size(50);
        }
        let mut chart = builder.build_cartesian_2d(0.0..lx, 0.0..ly)?;

        if labeled {
            chart
                .configure_mesh()
                .disable_mesh()
                .x_desc("x")
                .y_desc("y")
                .x_label_formatter(&|x| format!("{:.1}", x))
                .y_label_formatter(&|y| format!("{:.1}", y))
                .draw()?;
        }

        chart.draw_series((0..nx).flat_map(|i| (0..ny).map(move |j| (i, j))).map(|(i, j)| {
            let x0 = i as f64 * dx;
            let y0 = j as f64 * dy;
            let color = value_color(self.array[(i, j)], self.min_val, self.max_val);
            Rectangle::new([(x0, y0), (x0 + dx, y0 + dy)], color.filled())
        }))?;

        root.present()?;
        Ok(())
    }
}

/// Blue (min) through white to red (max); non-finite values are gray.
pub fn value_color(value: f64, min_val: f64, max_val: f64) -> RGBColor {
    if !value.is_finite() {
        return RGBColor(128, 128, 128);
    }
    let t = ((value - min_val) / (max_val - min_val)).clamp(0.0, 1.0);
    let lerp = |a: f64, b: f64, s: f64| (a + (b - a) * s).round() as u8;
    if t < 0.5 {
        let s = t / 0.5;
        RGBColor(lerp(49.0, 255.0, s), lerp(54.0, 255.0, s), lerp(149.0, 255.0, s))
    } else {
        let s = (t - 0.5) / 0.5;
        RGBColor(lerp(255.0, 165.0, s), lerp(255.0, 0.0, s), lerp(255.0, 38.0, s))
    }
}
