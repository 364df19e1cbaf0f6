use handservo_rs::servo::config::ControllerConfig;
use handservo_rs::servo::ServoBank;
use handservo_rs::{Landmark, LANDMARK_COUNT};

const CONFIG: &str = r#"{
    "host": "192.168.4.1",
    "port": 80,
    "formulas": {
        "1": "map(distance(4, 8), 0.01, 0.1, 0, 1023)",
        "2": "map(Ly[12] - Ly[9], -0.08, 0, 1023, 0)",
        "6": "rotationY(0, 5, 17) * 20"
    },
    "servoMax": { "6": 4095 }
}"#;

/// A hand closing over `steps` frames.
fn recording(steps: usize) -> Vec<Vec<Landmark>> {
    (0..steps)
        .map(|step| {
            let closing = step as f64 / steps as f64;
            (0..LANDMARK_COUNT)
                .map(|i| {
                    let finger = i.saturating_sub(1) / 4;
                    let joint = (i.saturating_sub(1) % 4) as f64;
                    let x = finger as f64 * 0.02 - 0.04;
                    let y = -0.03 - joint * 0.02 * (1.0 - closing);
                    Landmark::at(x, y, joint * 0.01 * closing)
                })
                .collect()
        })
        .collect()
}

fn main() {
    pretty_env_logger::init();

    let config = ControllerConfig::from_json(CONFIG).expect("demo config is valid");
    let (registry, rejected) = config.registry().expect("servo ids are numeric");
    for (servo, err) in rejected {
        println!("servo {} skipped: {}", servo, err);
    }
    let limits = config.limits().expect("servo ids are numeric");

    let mut bank = ServoBank::new(registry, limits);
    let frames = recording(10);

    for (i, positions) in bank.evaluate_batch(&frames).iter().enumerate() {
        println!("frame {}: {:?}", i, positions);
    }

    bank.update(Some(&frames[0]));
    bank.update(None);
    println!("after losing the hand: {:?}", bank.positions());
}
