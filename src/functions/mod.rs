pub mod geometry;
pub mod utility;

use crate::ast::Evaluator;

pub fn register_functions(evaluator: &mut Evaluator) {
    geometry::register(evaluator);
    utility::register(evaluator);
}
