use handservo_rs::servo::{ServoLimits, EXTENDED_SERVO_MAX};
use handservo_rs::{error_message, evaluate_formula, validate, HandLandmark, Landmark, LANDMARK_COUNT};

fn main() {
    pretty_env_logger::init();

    let mut landmarks = vec![Landmark::default(); LANDMARK_COUNT];
    landmarks[HandLandmark::Wrist.index()] = Landmark::at(0.0, 0.0, 0.0);
    landmarks[HandLandmark::ThumbTip.index()] = Landmark::at(0.03, -0.04, 0.0);
    landmarks[HandLandmark::IndexTip.index()] = Landmark::at(0.03, -0.09, 0.0);
    landmarks[HandLandmark::IndexMcp.index()] = Landmark::at(0.02, -0.05, 0.0);
    landmarks[HandLandmark::PinkyMcp.index()] = Landmark::at(-0.03, -0.04, 0.01);

    let mut limits = ServoLimits::new();
    limits.set_max(6, EXTENDED_SERVO_MAX);

    let formulas = [
        (1, "map(distance(4, 8), 0, 0.1, 0, 1023)"),
        (2, "Ly[8] * -10000"),
        (6, "rotationY(0, 5, 17) * 20"),
        (3, "map(distance(4, 8), 0, 0.1, 0"),
        (4, ""),
    ];

    for (servo, formula) in formulas {
        if !validate(formula) {
            println!(
                "servo {}: {:?} rejected: {}",
                servo,
                formula,
                error_message(formula).unwrap_or_default()
            );
            continue;
        }
        match evaluate_formula(formula, Some(&landmarks), limits.range_for(servo)) {
            Ok(position) => println!("servo {}: {} -> {}", servo, formula, position),
            Err(err) => println!("servo {}: {} failed: {}", servo, formula, err),
        }
    }
}
