#![allow(non_snake_case)]
use std::collections::HashMap;
pub mod symbolic;

use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::symbolic_solve::{
    solve_critical_points, solve_critical_points_logged, solve_stationary_2d,
};
pub mod Utils;
use crate::Utils::logger::save_curve_csv;
use crate::Utils::plots::{plot_2d, plot_2d_gnuplot, plot_3d};

fn main() {
    let example = 0;
    match example {
        0 => {
            // CRITICAL POINTS OF A FUNCTION OF 1 VARIABLE
            // parse expression from string to symbolic expression
            let input = "(x-3)^2";
            let f = Expr::parse_expression(input);
            println!(" parsed_expression {}", f);
            // differentiate, then solve f'(x) = 0
            let (derivative, points) = solve_critical_points(&f, "x").unwrap();
            println!("f'(x) = {}", derivative);
            println!("critical points = {:?}", points);
            // evaluate the function at every critical point
            let f_num = f.lambdify1D();
            for point in &points {
                let x = point.as_const().unwrap();
                println!("f({}) = {}", x, f_num(x));
            }
        }
        1 => {
            // CUBIC DERIVATIVE: THREE CRITICAL POINTS
            let f = Expr::parse_expression("x^4/4 - x^2");
            let (derivative, points) = solve_critical_points(&f, "x").unwrap();
            println!("f'(x) = {}", derivative);
            for point in &points {
                println!("critical point x = {}", point);
            }
        }
        2 => {
            // QUADRATIC WITH SYMBOLIC COEFFICIENTS
            // critical points of a parametric function stay symbolic
            let f = Expr::parse_expression("a*x^2 + b*x + c");
            let (derivative, points) = solve_critical_points(&f, "x").unwrap();
            println!("f'(x) = {}", derivative);
            println!("critical points = {:?}", points);
            // substitute the parameters to get a number
            let root = points[0]
                .set_variable("a", 1.0)
                .set_variable("b", -4.0)
                .simplify();
            println!("root at a = 1, b = -4: {}", root);
        }
        3 => {
            // 2D PLOT: FUNCTION AND DERIVATIVE SIDE BY SIDE
            let f = Expr::parse_expression("x^3 - 3*x");
            let (derivative, points) = solve_critical_points(&f, "x").unwrap();
            plot_2d(&f, &derivative, &points, -3.0, 3.0, "cubic.png").unwrap();
            println!("saved cubic.png");
        }
        4 => {
            // 3D PLOT: SURFACE AND ITS STATIONARY POINT
            let f = Expr::parse_expression("x^2 + y^2 - 2*x - 4*y");
            let stationary = solve_stationary_2d(&f, "x", "y").unwrap();
            println!("stationary point = {:?}", stationary);
            plot_3d(&f, &stationary, "surface.png").unwrap();
            // or mark a point you already know without solving
            let saddle = Expr::parse_expression("x^2 - y^2");
            let mut known_point = HashMap::new();
            known_point.insert("x".to_string(), 0.0);
            known_point.insert("y".to_string(), 0.0);
            plot_3d(&saddle, &known_point, "saddle.png").unwrap();
        }
        5 => {
            // GNUPLOT BACKEND AND CSV EXPORT
            let f = Expr::parse_expression("x^3 - 3*x");
            let (derivative, points) = solve_critical_points(&f, "x").unwrap();
            plot_2d_gnuplot(&f, &derivative, &points, -3.0, 3.0, "cubic_gnuplot.png").unwrap();
            save_curve_csv(&f, &derivative, -3.0, 3.0, 400, "cubic.csv").unwrap();
            println!("saved cubic_gnuplot.png and cubic.csv");
        }
        6 => {
            // SOLVE WITH LOGGING TURNED ON
            let f = Expr::parse_expression("x^3 - 3*x");
            let (derivative, points) =
                solve_critical_points_logged(&f, "x", Some("info".to_string()), false).unwrap();
            println!("f'(x) = {}, critical points = {:?}", derivative, points);
        }
        _ => {
            println!("example not found");
        }
    }
}
