use crate::ast::Evaluator;
use crate::error::EvaluationError;
use crate::landmarks::EvalContext;
use handservo_macros::formula_fn;

/// Reference direction `rotationY` measures the palm normal against.
pub const ROTATION_REFERENCE: [f64; 3] = [0.0, -1.0, 0.0];

pub fn register(evaluator: &mut Evaluator) {
    evaluator.register_function("distance", distance);
    evaluator.register_function("rotationY", rotation_y);
}

fn sub(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

fn dot(a: [f64; 3], b: [f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

fn cross(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

/// A zero vector normalizes to NaN components.
fn normalize(v: [f64; 3]) -> [f64; 3] {
    let length = dot(v, v).sqrt();
    [v[0] / length, v[1] / length, v[2] / length]
}

/// Euclidean distance between two landmarks in metric space.
#[formula_fn("distance")]
pub fn distance(ctx: &EvalContext<'_>, id1: f64, id2: f64) -> Result<f64, EvaluationError> {
    let a = ctx.landmark(id1)?.position();
    let b = ctx.landmark(id2)?.position();
    let d = sub(b, a);
    Ok(dot(d, d).sqrt())
}

/// Angle in degrees between the normal of the plane through three landmarks
/// and [`ROTATION_REFERENCE`].
///
/// The normal is `(p2 - p1) x (p3 - p1)`, so its sign follows the winding of
/// the three ids. Collinear landmarks give NaN.
#[formula_fn("rotationY")]
pub fn rotation_y(
    ctx: &EvalContext<'_>,
    id1: f64,
    id2: f64,
    id3: f64,
) -> Result<f64, EvaluationError> {
    let p1 = ctx.landmark(id1)?.position();
    let p2 = ctx.landmark(id2)?.position();
    let p3 = ctx.landmark(id3)?.position();

    let normal = normalize(cross(sub(p2, p1), sub(p3, p1)));
    Ok(dot(normal, ROTATION_REFERENCE).acos().to_degrees())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmarks::{HandLandmark, Landmark, LANDMARK_COUNT};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn random_frame(rng: &mut StdRng) -> Vec<Landmark> {
        (0..LANDMARK_COUNT)
            .map(|_| Landmark {
                x: rng.random_range(0.0..1.0),
                y: rng.random_range(0.0..1.0),
                z: 0.0,
                x3d: rng.random_range(-0.1..0.1),
                y3d: rng.random_range(-0.1..0.1),
                z3d: rng.random_range(-0.1..0.1),
            })
            .collect()
    }

    fn flat_frame() -> Vec<Landmark> {
        let mut landmarks = vec![Landmark::default(); LANDMARK_COUNT];
        landmarks[0] = Landmark::at(0.0, 0.0, 0.0);
        landmarks[1] = Landmark::at(3.0, 0.0, 0.0);
        landmarks[2] = Landmark::at(0.0, 4.0, 0.0);
        landmarks[3] = Landmark::at(0.0, 0.0, 1.0);
        landmarks[4] = Landmark::at(6.0, 0.0, 0.0);
        landmarks[5] = Landmark::at(0.0, 1.0, 1.0);
        landmarks[6] = Landmark::at(1.0, 0.0, 0.0);
        landmarks
    }

    #[test]
    fn test_distance() {
        let landmarks = flat_frame();
        let ctx = EvalContext::new(&landmarks);
        assert_eq!(distance(&ctx, &[1.0, 2.0]), Ok(5.0));
        assert_eq!(distance(&ctx, &[0.0, 1.0]), Ok(3.0));
        assert_eq!(distance(&ctx, &[2.0, 2.0]), Ok(0.0));
    }

    #[test]
    fn test_distance_ignores_display_coordinates() {
        let mut landmarks = flat_frame();
        landmarks[1].x = 100.0;
        landmarks[1].y = -100.0;
        let ctx = EvalContext::new(&landmarks);
        assert_eq!(distance(&ctx, &[0.0, 1.0]), Ok(3.0));
    }

    #[test]
    fn test_distance_is_symmetric() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let landmarks = random_frame(&mut rng);
            let ctx = EvalContext::new(&landmarks);
            for (a, b) in [(0.0, 5.0), (4.0, 8.0), (12.0, 20.0)] {
                let forward = distance(&ctx, &[a, b]).unwrap();
                let backward = distance(&ctx, &[b, a]).unwrap();
                assert_eq!(forward, backward);
                assert!(forward > 0.0);
            }
        }
    }

    #[test]
    fn test_distance_errors() {
        let landmarks = flat_frame();
        let ctx = EvalContext::new(&landmarks);
        assert_eq!(
            distance(&ctx, &[0.0, 25.0]),
            Err(EvaluationError::InvalidLandmark("25".to_string()))
        );
        assert_eq!(
            distance(&ctx, &[0.0]),
            Err(EvaluationError::ArgumentCount {
                function: "distance".to_string(),
                expected: 2,
                found: 1,
            })
        );
        assert_eq!(
            distance(&EvalContext::empty(), &[0.0, 1.0]),
            Err(EvaluationError::NoLandmarks)
        );
    }

    #[test]
    fn test_rotation_y_reference_angles() {
        let landmarks = flat_frame();
        let ctx = EvalContext::new(&landmarks);
        // (1-0) x (2-0) points along +z, perpendicular to the reference
        let angle = rotation_y(&ctx, &[0.0, 1.0, 2.0]).unwrap();
        assert!((angle - 90.0).abs() < 1e-9);
        // (3-0) x (1-0) points along +y, opposite the reference
        let angle = rotation_y(&ctx, &[0.0, 3.0, 1.0]).unwrap();
        assert!((angle - 180.0).abs() < 1e-9);
        // reversed winding points along -y, same as the reference
        let angle = rotation_y(&ctx, &[0.0, 1.0, 3.0]).unwrap();
        assert!(angle.abs() < 1e-6);
    }

    #[test]
    fn test_rotation_y_tilted_plane() {
        let landmarks = flat_frame();
        let ctx = EvalContext::new(&landmarks);
        // normal (0, -1, 1) sits halfway between the reference and +z
        let angle = rotation_y(&ctx, &[0.0, 6.0, 5.0]).unwrap();
        assert!((angle - 45.0).abs() < 1e-9);
        let angle = rotation_y(&ctx, &[0.0, 5.0, 6.0]).unwrap();
        assert!((angle - 135.0).abs() < 1e-9);
    }

    #[test]
    fn test_rotation_y_is_plain_acos_of_normal() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..50 {
            let landmarks = random_frame(&mut rng);
            let ctx = EvalContext::new(&landmarks);
            let p: Vec<[f64; 3]> = [0usize, 5, 17].iter().map(|&i| landmarks[i].position()).collect();
            let normal = normalize(cross(sub(p[1], p[0]), sub(p[2], p[0])));
            let expected = dot(normal, ROTATION_REFERENCE).acos().to_degrees();
            assert_eq!(rotation_y(&ctx, &[0.0, 5.0, 17.0]).unwrap(), expected);
        }
    }

    #[test]
    fn test_rotation_y_collinear_is_nan() {
        let landmarks = flat_frame();
        let ctx = EvalContext::new(&landmarks);
        let wrist = HandLandmark::Wrist.index() as f64;
        assert!(rotation_y(&ctx, &[wrist, 1.0, 4.0]).unwrap().is_nan());
    }

    #[test]
    fn test_rotation_y_errors() {
        let landmarks = flat_frame();
        let ctx = EvalContext::new(&landmarks);
        assert!(matches!(
            rotation_y(&ctx, &[0.0, 1.0]),
            Err(EvaluationError::ArgumentCount { expected: 3, found: 2, .. })
        ));
        assert!(matches!(
            rotation_y(&ctx, &[0.0, 1.0, -2.0]),
            Err(EvaluationError::InvalidLandmark(_))
        ));
    }
}
