//! Tabular export of sampled curves, for users who want the raw numbers
//! behind a figure. Columns are x, f(x), f'(x), written as csv or as
//! tab-separated text.
use crate::Utils::plots::PlotError;
use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::utils::linspace;
use csv::Writer;
use log::info;
use std::fs::File;
use std::io::Write as IoWrite;

/// Samples a function and its derivative on [x_left, x_right] and writes the
/// table to a csv file.
pub fn save_curve_csv(
    function_expr: &Expr,
    derivative_expr: &Expr,
    x_left: f64,
    x_right: f64,
    num_values: usize,
    filename: &str,
) -> Result<(), PlotError> {
    let f = function_expr.lambdify1D();
    let df = derivative_expr.lambdify1D();
    let file = File::create(filename)?;
    let mut writer = Writer::from_writer(file);
    writer.write_record(&["x", "f(x)", "f'(x)"])?;
    for x in linspace(x_left, x_right, num_values) {
        writer.write_record(&[x.to_string(), f(x).to_string(), df(x).to_string()])?;
    }
    writer.flush()?;
    info!("curve table saved to {}", filename);
    Ok(())
}

/// Same table as [`save_curve_csv`] in tab-separated form.
pub fn save_curve_to_file(
    function_expr: &Expr,
    derivative_expr: &Expr,
    x_left: f64,
    x_right: f64,
    num_values: usize,
    filename: &str,
) -> Result<(), PlotError> {
    let f = function_expr.lambdify1D();
    let df = derivative_expr.lambdify1D();
    let mut file = File::create(filename)?;
    writeln!(file, "{}", ["x", "f(x)", "f'(x)"].join("\t"))?;
    for x in linspace(x_left, x_right, num_values) {
        let row = [x.to_string(), f(x).to_string(), df(x).to_string()];
        writeln!(file, "{}", row.join("\t"))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_save_curve_csv() {
        let f = Expr::parse_expression("(x-3)^2");
        let df = f.diff("x").simplify();
        let dir = tempdir().unwrap();
        let path = dir.path().join("curve.csv");
        let path = path.to_str().unwrap();
        save_curve_csv(&f, &df, 0.0, 6.0, 4, path).unwrap();
        let content = std::fs::read_to_string(path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], "x,f(x),f'(x)");
        assert_eq!(lines[1], "0,9,-6");
    }

    #[test]
    fn test_save_curve_to_file() {
        let f = Expr::parse_expression("x^2");
        let df = f.diff("x").simplify();
        let dir = tempdir().unwrap();
        let path = dir.path().join("curve.txt");
        let path = path.to_str().unwrap();
        save_curve_to_file(&f, &df, 0.0, 2.0, 3, path).unwrap();
        let content = std::fs::read_to_string(path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "x\tf(x)\tf'(x)");
        assert_eq!(lines[2], "1\t1\t2");
    }
}
