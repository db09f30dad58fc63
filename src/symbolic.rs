#![allow(non_camel_case_types)]
#![allow(non_snake_case)]
/// a module turns a String expression into a symbolic expression
///
///# Example
/// ```
/// use RustedCalc::symbolic::symbolic_engine::Expr;
/// let input = "x^2 - 4*x + 1";
/// let parsed_expression = Expr::parse_expression(input);
/// println!(" parsed_expression {}", parsed_expression);
/// let parsed_function = parsed_expression.lambdify1D();
/// println!("{}, Rust function at x = 2: {} \n", input, parsed_function(2.0));
/// ```
/// ________________________________________________________________________________________________________________________________
pub mod parse_expr;
///____________________________________________________________________________________________________________________________
/// # Symbolic engine
/// a module
/// 1) turns a String expression into a symbolic expression
/// 2) turns a symbolic expression into a Rust function
/// 3) differentiates and simplifies symbolic expressions
///# Example#
/// ```
/// use RustedCalc::symbolic::symbolic_engine::Expr;
/// let input = "(x-3)^2";
///  // here you've got symbolic expression
/// let parsed_expression = Expr::parse_expression(input);
/// println!(" parsed_expression {}", parsed_expression);
///  // differentiate with respect to x
/// let df_dx = parsed_expression.diff("x").simplify();
/// println!("df_dx = {}", df_dx);
///  // return vec of all arguments
/// let all = parsed_expression.all_arguments_are_variables();
/// println!("all arguments are variables {:?}", all);
///  // convert symbolic expression to a Rust function and evaluate the function
/// let f = parsed_expression.lambdify1D();
/// println!("f(1) = {}", f(1.0));
/// ```
/// ________________________________________________________________________________________________________________________________________________
pub mod symbolic_engine;
pub mod symbolic_engine_derivatives;
pub mod symbolic_lambdify;
pub mod symbolic_simplify;
///________________________________________________________________________________________________________________________________________________
///
/// critical points of a function: differentiate, then solve f'(x) = 0
/// Example#
/// ```
/// use RustedCalc::symbolic::symbolic_engine::Expr;
/// use RustedCalc::symbolic::symbolic_solve::solve_critical_points;
/// let f = Expr::parse_expression("x^3 - 3*x");
/// let (derivative, points) = solve_critical_points(&f, "x").unwrap();
/// println!("f'(x) = {}, critical points {:?}", derivative, points);
/// ```
pub mod symbolic_solve;
///______________________________________________________________________________________________________________________________________________
/// the collection of utility functions, mainly linspace grids for sampling
/// _____________________________________________________________________________________________________________________________________________
pub mod utils;
