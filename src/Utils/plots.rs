//! Rendering of analysis results. A 2D figure shows a function next to its
//! derivative with the critical points marked, a 3D figure shows a surface
//! with its stationary point next to a contour map. Backends are plotters
//! (PNG, no external binary needed) and gnuplot for users who prefer it.
use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::utils::linspace;
use gnuplot::{AxesCommon, Caption, Color, DashType, Figure, LineStyle, PointSymbol, RGBString};
use itertools::{Itertools, MinMaxResult};
use log::info;
use std::collections::HashMap;
use thiserror::Error;

/// number of samples per plotted curve
const CURVE_SAMPLES: usize = 400;
/// surface grid resolution per axis
const SURFACE_SAMPLES: usize = 100;
/// surfaces are rendered on the square [-5, 5] x [-5, 5]
const SURFACE_HALF_RANGE: f64 = 5.0;
/// number of bands in the contour map
const CONTOUR_LEVELS: usize = 50;

#[derive(Debug, Error)]
pub enum PlotError {
    #[error("no critical points to mark, nothing to plot")]
    NoCriticalPoints,
    #[error("critical point mapping has no value for variable '{0}'")]
    MissingCoordinate(String),
    #[error("critical point '{0}' is symbolic, plotting needs numeric coordinates")]
    SymbolicPoint(String),
    #[error("drawing failed: {0}")]
    Draw(String),
    #[error("csv export failed: {0}")]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

fn draw_err<E: std::fmt::Display>(err: E) -> PlotError {
    PlotError::Draw(err.to_string())
}

/// Numeric values of the critical points. Roots that still carry symbols
/// (parametric coefficients) cannot be placed on an axis.
fn numeric_points(points: &[Expr]) -> Result<Vec<f64>, PlotError> {
    points
        .iter()
        .map(|p| {
            p.as_const()
                .ok_or_else(|| PlotError::SymbolicPoint(p.to_string()))
        })
        .collect()
}

/// Axis range with a small margin so the curve does not touch the frame.
fn padded_range(values: &[f64]) -> (f64, f64) {
    let (min, max) = match values.iter().copied().minmax() {
        MinMaxResult::NoElements => (0.0, 1.0),
        MinMaxResult::OneElement(v) => (v, v),
        MinMaxResult::MinMax(lo, hi) => (lo, hi),
    };
    let span = max - min;
    if span == 0.0 {
        (min - 1.0, max + 1.0)
    } else {
        (min - 0.05 * span, max + 0.05 * span)
    }
}

//_________________________2D PLOTTING___________________________________

/// Plots a function of one variable next to its derivative on
/// [x_left, x_right] and saves the figure as a PNG file. Critical points are
/// marked on both curves, with dashed vertical guides, and the derivative
/// panel carries a dashed zero line so the sign changes are visible.
pub fn plot_2d(
    function_expr: &Expr,
    derivative_expr: &Expr,
    critical_points: &[Expr],
    x_left: f64,
    x_right: f64,
    filename: &str,
) -> Result<(), PlotError> {
    use plotters::prelude::*;
    if critical_points.is_empty() {
        return Err(PlotError::NoCriticalPoints);
    }
    let points = numeric_points(critical_points)?;
    let f = function_expr.lambdify1D();
    let df = derivative_expr.lambdify1D();
    let xs = linspace(x_left, x_right, CURVE_SAMPLES);
    let ys: Vec<f64> = xs.iter().map(|x| f(*x)).collect();
    let dys: Vec<f64> = xs.iter().map(|x| df(*x)).collect();

    let root_area = BitMapBackend::new(filename, (800, 600)).into_drawing_area();
    root_area.fill(&WHITE).map_err(draw_err)?;
    let panels = root_area.split_evenly((1, 2));
    let grey = RGBColor(128, 128, 128);

    // left panel: the function itself
    let (y_min, y_max) = padded_range(&ys);
    let mut chart = ChartBuilder::on(&panels[0])
        .caption(
            format!("f(x), critical point x = {:.4}", points[0]),
            ("sans-serif", 20),
        )
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(30)
        .build_cartesian_2d(x_left..x_right, y_min..y_max)
        .map_err(draw_err)?;
    chart
        .configure_mesh()
        .x_desc("x")
        .y_desc("f(x)")
        .draw()
        .map_err(draw_err)?;
    chart
        .draw_series(LineSeries::new(
            xs.iter().zip(ys.iter()).map(|(&x, &y)| (x, y)),
            &BLUE,
        ))
        .map_err(draw_err)?
        .label("f(x)")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &BLUE));
    for &cp in &points {
        chart
            .draw_series(DashedLineSeries::new(
                [(cp, y_min), (cp, y_max)],
                4,
                4,
                grey.stroke_width(1),
            ))
            .map_err(draw_err)?;
    }
    chart
        .draw_series(
            points
                .iter()
                .map(|&cp| Circle::new((cp, f(cp)), 4, RED.filled())),
        )
        .map_err(draw_err)?
        .label("critical points")
        .legend(|(x, y)| Circle::new((x + 10, y), 4, RED.filled()));
    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()
        .map_err(draw_err)?;

    // right panel: the derivative with its zero line
    let (dy_min, dy_max) = padded_range(&dys);
    let mut chart = ChartBuilder::on(&panels[1])
        .caption("f'(x)", ("sans-serif", 20))
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(30)
        .build_cartesian_2d(x_left..x_right, dy_min..dy_max)
        .map_err(draw_err)?;
    chart
        .configure_mesh()
        .x_desc("x")
        .y_desc("f'(x)")
        .draw()
        .map_err(draw_err)?;
    chart
        .draw_series(LineSeries::new(
            xs.iter().zip(dys.iter()).map(|(&x, &y)| (x, y)),
            &GREEN,
        ))
        .map_err(draw_err)?
        .label("f'(x)")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &GREEN));
    chart
        .draw_series(DashedLineSeries::new(
            [(x_left, 0.0), (x_right, 0.0)],
            6,
            6,
            BLACK.stroke_width(1),
        ))
        .map_err(draw_err)?;
    for &cp in &points {
        chart
            .draw_series(DashedLineSeries::new(
                [(cp, dy_min), (cp, dy_max)],
                4,
                4,
                grey.stroke_width(1),
            ))
            .map_err(draw_err)?;
    }
    chart
        .draw_series(
            points
                .iter()
                .map(|&cp| Circle::new((cp, df(cp)), 4, RED.filled())),
        )
        .map_err(draw_err)?;
    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()
        .map_err(draw_err)?;
    root_area.present().map_err(draw_err)?;
    info!("2D plot of {} saved to {}", function_expr, filename);
    Ok(())
} // end of plot_2d

/// Same figure as [`plot_2d`] rendered through gnuplot. Needs the gnuplot
/// binary installed on the machine.
pub fn plot_2d_gnuplot(
    function_expr: &Expr,
    derivative_expr: &Expr,
    critical_points: &[Expr],
    x_left: f64,
    x_right: f64,
    filename: &str,
) -> Result<(), PlotError> {
    if critical_points.is_empty() {
        return Err(PlotError::NoCriticalPoints);
    }
    let points = numeric_points(critical_points)?;
    let f = function_expr.lambdify1D();
    let df = derivative_expr.lambdify1D();
    let xs = linspace(x_left, x_right, CURVE_SAMPLES);
    let ys: Vec<f64> = xs.iter().map(|x| f(*x)).collect();
    let dys: Vec<f64> = xs.iter().map(|x| df(*x)).collect();
    let point_ys: Vec<f64> = points.iter().map(|&p| f(p)).collect();
    let point_dys: Vec<f64> = points.iter().map(|&p| df(p)).collect();

    let mut fg = Figure::new();
    let function_title = format!("f(x), critical point x = {:.4}", points[0]);
    fg.axes2d()
        .set_pos_grid(1, 2, 0)
        .set_title(&function_title, &[])
        .set_x_label("x", &[])
        .set_y_label("f(x)", &[])
        .lines(
            xs.as_slice(),
            ys.as_slice(),
            &[Caption("f(x)"), Color(RGBString("blue"))],
        )
        .points(
            points.as_slice(),
            point_ys.as_slice(),
            &[Caption("critical points"), Color(RGBString("red")), PointSymbol('O')],
        );
    fg.axes2d()
        .set_pos_grid(1, 2, 1)
        .set_title("f'(x)", &[])
        .set_x_label("x", &[])
        .set_y_label("f'(x)", &[])
        .lines(
            xs.as_slice(),
            dys.as_slice(),
            &[Caption("f'(x)"), Color(RGBString("green"))],
        )
        .lines(
            &[x_left, x_right],
            &[0.0, 0.0],
            &[Color(RGBString("black")), LineStyle(DashType::Dash)],
        )
        .points(
            points.as_slice(),
            point_dys.as_slice(),
            &[Caption("critical points"), Color(RGBString("red")), PointSymbol('O')],
        );
    fg.save_to_png(filename, 800, 600).map_err(draw_err)?;
    info!("gnuplot 2D figure saved to {}", filename);
    Ok(())
} // end of plot_2d_gnuplot

//_________________________3D PLOTTING___________________________________

/// Plots a surface z = f(x, y) over [-5, 5] x [-5, 5] with its stationary
/// point marked, next to a contour map of the same surface, and saves the
/// figure as a PNG file. The mapping must carry a value for every plotted
/// variable. A surface of more than two variables makes the numeric
/// conversion panic, as everywhere else in the crate.
pub fn plot_3d(
    surface_expr: &Expr,
    critical_point: &HashMap<String, f64>,
    filename: &str,
) -> Result<(), PlotError> {
    use plotters::prelude::*;
    let mut vars = surface_expr.all_arguments_are_variables();
    if vars.len() < 2 {
        // constant and single-variable surfaces take the missing axis
        // names from the mapping
        let mut extra: Vec<String> = critical_point
            .keys()
            .filter(|k| !vars.contains(*k))
            .cloned()
            .collect();
        extra.sort();
        vars.extend(extra);
        vars.truncate(2);
    }
    if vars.len() < 2 {
        return Err(PlotError::Draw(
            "a surface needs two axis variables".to_string(),
        ));
    }
    let var1 = vars[0].clone();
    let var2 = vars[1].clone();
    let cx = *critical_point
        .get(&var1)
        .ok_or_else(|| PlotError::MissingCoordinate(var1.clone()))?;
    let cy = *critical_point
        .get(&var2)
        .ok_or_else(|| PlotError::MissingCoordinate(var2.clone()))?;
    let f = surface_expr.lambdify2D(&var1, &var2);

    let grid = linspace(-SURFACE_HALF_RANGE, SURFACE_HALF_RANGE, SURFACE_SAMPLES);
    let mut z_values = Vec::with_capacity(SURFACE_SAMPLES * SURFACE_SAMPLES);
    for &x in &grid {
        for &y in &grid {
            z_values.push(f(x, y));
        }
    }
    let (z_min, z_max) = padded_range(&z_values);
    let z_span = z_max - z_min;

    let root_area = BitMapBackend::new(filename, (1200, 600)).into_drawing_area();
    root_area.fill(&WHITE).map_err(draw_err)?;
    let panels = root_area.split_evenly((1, 2));

    // left panel: the surface itself
    let mut chart = ChartBuilder::on(&panels[0])
        .caption(format!("z = {}", surface_expr), ("sans-serif", 20))
        .margin(10)
        .build_cartesian_3d(
            -SURFACE_HALF_RANGE..SURFACE_HALF_RANGE,
            z_min..z_max,
            -SURFACE_HALF_RANGE..SURFACE_HALF_RANGE,
        )
        .map_err(draw_err)?;
    chart.with_projection(|mut pb| {
        pb.yaw = 0.5;
        pb.scale = 0.9;
        pb.into_matrix()
    });
    chart.configure_axes().draw().map_err(draw_err)?;
    chart
        .draw_series(
            SurfaceSeries::xoz(grid.iter().copied(), grid.iter().copied(), |x, y| f(x, y))
                .style_func(&|&z| {
                    ViridisRGB::get_color(((z - z_min) / z_span).clamp(0.0, 1.0))
                        .mix(0.9)
                        .filled()
                }),
        )
        .map_err(draw_err)?;
    chart
        .draw_series(std::iter::once(Circle::new(
            (cx, f(cx, cy), cy),
            5,
            RED.filled(),
        )))
        .map_err(draw_err)?;

    // right panel: banded contour map of the same surface
    let mut chart = ChartBuilder::on(&panels[1])
        .caption("contour map", ("sans-serif", 20))
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(30)
        .build_cartesian_2d(
            -SURFACE_HALF_RANGE..SURFACE_HALF_RANGE,
            -SURFACE_HALF_RANGE..SURFACE_HALF_RANGE,
        )
        .map_err(draw_err)?;
    chart
        .configure_mesh()
        .x_desc(&var1)
        .y_desc(&var2)
        .draw()
        .map_err(draw_err)?;
    let step = 2.0 * SURFACE_HALF_RANGE / (SURFACE_SAMPLES as f64 - 1.0);
    chart
        .draw_series(
            grid.iter()
                .flat_map(|&x| grid.iter().map(move |&y| (x, y)))
                .map(|(x, y)| {
                    let t = ((f(x, y) - z_min) / z_span).clamp(0.0, 1.0);
                    let level = (t * CONTOUR_LEVELS as f64).floor() / CONTOUR_LEVELS as f64;
                    Rectangle::new(
                        [(x, y), (x + step, y + step)],
                        ViridisRGB::get_color(level).filled(),
                    )
                }),
        )
        .map_err(draw_err)?;
    chart
        .draw_series(std::iter::once(Circle::new((cx, cy), 5, RED.filled())))
        .map_err(draw_err)?;
    root_area.present().map_err(draw_err)?;
    info!(
        "3D plot of {} around ({}, {}) saved to {}",
        surface_expr, cx, cy, filename
    );
    Ok(())
} // end of plot_3d

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn png_path(dir: &tempfile::TempDir, name: &str) -> String {
        dir.path().join(name).to_str().unwrap().to_string()
    }

    #[test]
    fn test_plot_2d_writes_png() {
        let f = Expr::parse_expression("(x-3)^2");
        let df = f.diff("x").simplify();
        let points = vec![Expr::Const(3.0)];
        let dir = tempdir().unwrap();
        let path = png_path(&dir, "parabola.png");
        plot_2d(&f, &df, &points, 0.0, 6.0, &path).unwrap();
        let meta = std::fs::metadata(&path).unwrap();
        assert!(meta.len() > 0);
    }

    #[test]
    fn test_plot_2d_marks_every_point() {
        let f = Expr::parse_expression("x^3 - 3*x");
        let df = f.diff("x").simplify();
        let points = vec![Expr::Const(-1.0), Expr::Const(1.0)];
        let dir = tempdir().unwrap();
        let path = png_path(&dir, "cubic.png");
        plot_2d(&f, &df, &points, -3.0, 3.0, &path).unwrap();
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }

    #[test]
    fn test_plot_2d_empty_points_is_error() {
        let f = Expr::parse_expression("x^2");
        let df = f.diff("x").simplify();
        let dir = tempdir().unwrap();
        let path = png_path(&dir, "unused.png");
        let result = plot_2d(&f, &df, &[], -1.0, 1.0, &path);
        assert!(matches!(result, Err(PlotError::NoCriticalPoints)));
    }

    #[test]
    fn test_plot_2d_symbolic_point_is_error() {
        let f = Expr::parse_expression("x^2 - a*x");
        let df = f.diff("x").simplify();
        let points = vec![Expr::Var("a".to_string())];
        let dir = tempdir().unwrap();
        let path = png_path(&dir, "unused.png");
        let result = plot_2d(&f, &df, &points, -1.0, 1.0, &path);
        assert!(matches!(result, Err(PlotError::SymbolicPoint(_))));
    }

    #[test]
    #[should_panic(expected = "exactly one variable")]
    fn test_plot_2d_rejects_two_variable_function() {
        let f = Expr::parse_expression("x + y");
        let df = f.diff("x");
        let points = vec![Expr::Const(0.0)];
        let dir = tempdir().unwrap();
        let path = png_path(&dir, "unused.png");
        let _ = plot_2d(&f, &df, &points, -1.0, 1.0, &path);
    }

    #[test]
    fn test_gnuplot_empty_points_is_error() {
        let f = Expr::parse_expression("x^2");
        let df = f.diff("x").simplify();
        let dir = tempdir().unwrap();
        let path = png_path(&dir, "unused.png");
        let result = plot_2d_gnuplot(&f, &df, &[], -1.0, 1.0, &path);
        assert!(matches!(result, Err(PlotError::NoCriticalPoints)));
    }

    #[test]
    fn test_plot_3d_writes_png() {
        let f = Expr::parse_expression("x^2 + y^2 - 2*x - 4*y");
        let mut point = HashMap::new();
        point.insert("x".to_string(), 1.0);
        point.insert("y".to_string(), 2.0);
        let dir = tempdir().unwrap();
        let path = png_path(&dir, "bowl.png");
        plot_3d(&f, &point, &path).unwrap();
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }

    #[test]
    fn test_plot_3d_flat_surface() {
        let f = Expr::Const(1.0);
        let mut point = HashMap::new();
        point.insert("x".to_string(), 0.0);
        point.insert("y".to_string(), 0.0);
        let dir = tempdir().unwrap();
        let path = png_path(&dir, "flat.png");
        plot_3d(&f, &point, &path).unwrap();
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }

    #[test]
    fn test_plot_3d_missing_coordinate() {
        let f = Expr::parse_expression("x^2 + y^2");
        let mut point = HashMap::new();
        point.insert("x".to_string(), 0.0);
        let dir = tempdir().unwrap();
        let path = png_path(&dir, "unused.png");
        let result = plot_3d(&f, &point, &path);
        match result {
            Err(PlotError::MissingCoordinate(name)) => assert_eq!(name, "y"),
            other => panic!("expected missing coordinate error, got {:?}", other),
        }
    }

    #[test]
    #[should_panic(expected = "not among")]
    fn test_plot_3d_rejects_three_variable_surface() {
        let f = Expr::parse_expression("x^2 + y^2 + z^2");
        let mut point = HashMap::new();
        point.insert("x".to_string(), 0.0);
        point.insert("y".to_string(), 0.0);
        point.insert("z".to_string(), 0.0);
        let dir = tempdir().unwrap();
        let path = png_path(&dir, "unused.png");
        let _ = plot_3d(&f, &point, &path);
    }
}
