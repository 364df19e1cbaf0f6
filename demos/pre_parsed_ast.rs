use handservo_rs::ast::Parser;
use handservo_rs::{EvalContext, FormulaEngine, Landmark, ServoRange, LANDMARK_COUNT};

fn main() {
    pretty_env_logger::init();

    let engine = FormulaEngine::new();

    let formula = "map(distance(0, 12), 0.05, 0.2, 0, 1023)";
    let ast = Parser::parse_formula(formula).expect("Failed to parse");
    println!("{:#?}", ast);

    for spread in [0.0, 0.004, 0.008, 0.012] {
        let landmarks: Vec<Landmark> = (0..LANDMARK_COUNT)
            .map(|i| Landmark::at(0.0, -(i as f64) * spread, 0.0))
            .collect();
        let ctx = EvalContext::new(&landmarks);
        match engine.evaluate_ast(&ast, &ctx, ServoRange::default()) {
            Ok(result) => println!("spread {}: {}", spread, result),
            Err(err) => println!("Error: {}", err),
        }
    }
}
