use crate::error::EvaluationError;
use serde::{Deserialize, Serialize};

/// Number of points in one tracked hand observation.
pub const LANDMARK_COUNT: usize = 21;

/// One tracked point of a hand.
///
/// `x`/`y`/`z` are the normalized, mirrored screen-space values used for
/// drawing. Formulas only ever see the metric `x3d`/`y3d`/`z3d` coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub z: f64,
    #[serde(rename = "x3D")]
    pub x3d: f64,
    #[serde(rename = "y3D")]
    pub y3d: f64,
    #[serde(rename = "z3D")]
    pub z3d: f64,
}

impl Landmark {
    /// A landmark whose display and metric coordinates coincide.
    pub fn at(x: f64, y: f64, z: f64) -> Self {
        Self {
            x,
            y,
            z,
            x3d: x,
            y3d: y,
            z3d: z,
        }
    }

    pub fn position(&self) -> [f64; 3] {
        [self.x3d, self.y3d, self.z3d]
    }

    pub fn coordinate(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.x3d,
            Axis::Y => self.y3d,
            Axis::Z => self.z3d,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl TryFrom<&str> for Axis {
    type Error = ();

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "x" => Ok(Axis::X),
            "y" => Ok(Axis::Y),
            "z" => Ok(Axis::Z),
            _ => Err(()),
        }
    }
}

/// Anatomical numbering of the 21 hand landmarks.
#[repr(usize)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum HandLandmark {
    Wrist = 0,
    ThumbCmc = 1,
    ThumbMcp = 2,
    ThumbIp = 3,
    ThumbTip = 4,
    IndexMcp = 5,
    IndexPip = 6,
    IndexDip = 7,
    IndexTip = 8,
    MiddleMcp = 9,
    MiddlePip = 10,
    MiddleDip = 11,
    MiddleTip = 12,
    RingMcp = 13,
    RingPip = 14,
    RingDip = 15,
    RingTip = 16,
    PinkyMcp = 17,
    PinkyPip = 18,
    PinkyDip = 19,
    PinkyTip = 20,
}

impl HandLandmark {
    pub const ALL: [HandLandmark; LANDMARK_COUNT] = [
        HandLandmark::Wrist,
        HandLandmark::ThumbCmc,
        HandLandmark::ThumbMcp,
        HandLandmark::ThumbIp,
        HandLandmark::ThumbTip,
        HandLandmark::IndexMcp,
        HandLandmark::IndexPip,
        HandLandmark::IndexDip,
        HandLandmark::IndexTip,
        HandLandmark::MiddleMcp,
        HandLandmark::MiddlePip,
        HandLandmark::MiddleDip,
        HandLandmark::MiddleTip,
        HandLandmark::RingMcp,
        HandLandmark::RingPip,
        HandLandmark::RingDip,
        HandLandmark::RingTip,
        HandLandmark::PinkyMcp,
        HandLandmark::PinkyPip,
        HandLandmark::PinkyDip,
        HandLandmark::PinkyTip,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

/// Everything a formula may read while it is evaluated: the current frame's
/// landmarks, or nothing when no hand is tracked.
#[derive(Debug, Clone, Copy, Default)]
pub struct EvalContext<'a> {
    landmarks: Option<&'a [Landmark]>,
}

impl<'a> EvalContext<'a> {
    pub fn new(landmarks: &'a [Landmark]) -> Self {
        Self {
            landmarks: Some(landmarks),
        }
    }

    /// Context for frames where no hand was detected.
    pub fn empty() -> Self {
        Self { landmarks: None }
    }

    pub fn has_landmarks(&self) -> bool {
        self.landmarks.is_some_and(|landmarks| !landmarks.is_empty())
    }

    /// Looks up a landmark by a numeric id coming out of a formula.
    ///
    /// The id must be an integer in `0..LANDMARK_COUNT` and present in the frame.
    pub fn landmark(&self, id: f64) -> Result<&'a Landmark, EvaluationError> {
        let landmarks = match self.landmarks {
            Some(landmarks) if !landmarks.is_empty() => landmarks,
            _ => return Err(EvaluationError::NoLandmarks),
        };
        if id.fract() != 0.0 || id < 0.0 || id >= LANDMARK_COUNT as f64 {
            return Err(EvaluationError::InvalidLandmark(id.to_string()));
        }
        landmarks
            .get(id as usize)
            .ok_or_else(|| EvaluationError::InvalidLandmark(id.to_string()))
    }
}

impl<'a> From<Option<&'a [Landmark]>> for EvalContext<'a> {
    fn from(landmarks: Option<&'a [Landmark]>) -> Self {
        Self { landmarks }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame() -> Vec<Landmark> {
        (0..LANDMARK_COUNT)
            .map(|i| Landmark::at(i as f64, 0.0, 0.0))
            .collect()
    }

    #[test]
    fn test_landmark_lookup() {
        let landmarks = frame();
        let ctx = EvalContext::new(&landmarks);
        assert_eq!(ctx.landmark(0.0).unwrap().x3d, 0.0);
        assert_eq!(ctx.landmark(20.0).unwrap().x3d, 20.0);
    }

    #[test]
    fn test_landmark_out_of_range() {
        let landmarks = frame();
        let ctx = EvalContext::new(&landmarks);
        assert_eq!(
            ctx.landmark(21.0),
            Err(EvaluationError::InvalidLandmark("21".to_string()))
        );
        assert!(ctx.landmark(-1.0).is_err());
        assert!(ctx.landmark(2.5).is_err());
        assert!(ctx.landmark(f64::NAN).is_err());
    }

    #[test]
    fn test_short_frame_rejects_missing_ids() {
        let landmarks = &frame()[..5];
        let ctx = EvalContext::new(landmarks);
        assert!(ctx.landmark(4.0).is_ok());
        assert!(matches!(
            ctx.landmark(8.0),
            Err(EvaluationError::InvalidLandmark(_))
        ));
    }

    #[test]
    fn test_no_landmarks() {
        assert_eq!(
            EvalContext::empty().landmark(0.0),
            Err(EvaluationError::NoLandmarks)
        );
        assert_eq!(
            EvalContext::new(&[]).landmark(0.0),
            Err(EvaluationError::NoLandmarks)
        );
    }

    #[test]
    fn test_anatomy_numbering() {
        assert_eq!(HandLandmark::Wrist.index(), 0);
        assert_eq!(HandLandmark::ThumbTip.index(), 4);
        assert_eq!(HandLandmark::IndexTip.index(), 8);
        assert_eq!(HandLandmark::PinkyTip.index(), 20);
        assert_eq!(HandLandmark::from_index(12), Some(HandLandmark::MiddleTip));
        assert_eq!(HandLandmark::from_index(21), None);
    }

    #[test]
    fn test_landmark_json_field_names() {
        let json = r#"{"x":0.5,"y":0.25,"z":0.0,"x3D":0.01,"y3D":-0.02,"z3D":0.03}"#;
        let landmark: Landmark = serde_json::from_str(json).unwrap();
        assert_eq!(landmark.position(), [0.01, -0.02, 0.03]);
        assert_eq!(landmark.coordinate(Axis::Y), -0.02);
    }
}
