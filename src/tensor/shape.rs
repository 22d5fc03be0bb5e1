//! Tensor shapes and types
//!
//! A [`TensorType`] pairs an element type with an ordered dimension list.
//! Dimensions that are unknown or dynamic are stored as [`UNKNOWN_DIM`].

use std::fmt;

use serde::{Deserialize, Serialize};

use super::dtype::DType;

/// Sentinel dimension for unknown/dynamic extents
pub const UNKNOWN_DIM: i64 = -1;

/// Calculate total number of elements from shape
///
/// Returns `None` when any dimension is dynamic or the count overflows
/// `usize`.
pub fn numel(shape: &[i64]) -> Option<usize> {
    shape.iter().try_fold(1usize, |acc, &d| {
        let d = usize::try_from(d).ok()?;
        acc.checked_mul(d)
    })
}

/// Check if shape contains dynamic dimensions (negative values)
pub fn is_dynamic(shape: &[i64]) -> bool {
    shape.iter().any(|&d| d < 0)
}

/// Element type plus shape of a value
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TensorType {
    /// Element type
    pub dtype: DType,
    /// Dimensions, outermost first; empty for scalars
    pub shape: Vec<i64>,
}

impl TensorType {
    /// Create a tensor type
    pub fn new(dtype: DType, shape: impl Into<Vec<i64>>) -> Self {
        Self {
            dtype,
            shape: shape.into(),
        }
    }

    /// Rank-0 tensor of the given element type
    pub fn scalar(dtype: DType) -> Self {
        Self {
            dtype,
            shape: Vec::new(),
        }
    }

    /// Whether the shape is empty
    pub fn is_scalar(&self) -> bool {
        self.shape.is_empty()
    }

    /// Number of dimensions
    pub fn rank(&self) -> usize {
        self.shape.len()
    }

    /// Whether any dimension is unknown
    pub fn is_dynamic(&self) -> bool {
        is_dynamic(&self.shape)
    }

    /// Element count, `None` if dynamic or too large
    pub fn numel(&self) -> Option<usize> {
        numel(&self.shape)
    }

    /// Byte size of a dense buffer, `None` if dynamic or too large
    pub fn size_in_bytes(&self) -> Option<usize> {
        self.numel()?.checked_mul(self.dtype.size_in_bytes())
    }
}

impl fmt::Display for TensorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[", self.dtype)?;
        for (i, d) in self.shape.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            if *d < 0 {
                f.write_str("?")?;
            } else {
                write!(f, "{}", d)?;
            }
        }
        f.write_str("]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numel() {
        assert_eq!(numel(&[1, 3, 224, 224]), Some(150528));
        assert_eq!(numel(&[]), Some(1));
        assert_eq!(numel(&[UNKNOWN_DIM, 3]), None);
    }

    #[test]
    fn test_numel_overflow() {
        assert_eq!(numel(&[i64::MAX, i64::MAX]), None);
        assert_eq!(numel(&[i64::MAX, 0]), Some(0));

        let huge = TensorType::new(DType::F64, [1 << 62]);
        assert_eq!(huge.size_in_bytes(), None);
        assert_eq!(TensorType::new(DType::F64, [i64::MAX, 3]).numel(), None);
    }

    #[test]
    fn test_is_dynamic() {
        assert!(!is_dynamic(&[1, 3]));
        assert!(is_dynamic(&[UNKNOWN_DIM, 3]));
    }

    #[test]
    fn test_tensor_type_helpers() {
        let t = TensorType::new(DType::F32, [1, 3]);
        assert!(!t.is_scalar());
        assert_eq!(t.rank(), 2);
        assert_eq!(t.size_in_bytes(), Some(12));

        let s = TensorType::scalar(DType::I64);
        assert!(s.is_scalar());
        assert_eq!(s.rank(), 0);
        assert_eq!(s.numel(), Some(1));
    }

    #[test]
    fn test_display() {
        let t = TensorType::new(DType::F16, [UNKNOWN_DIM, 128]);
        assert_eq!(t.to_string(), "f16[?,128]");
        assert_eq!(TensorType::scalar(DType::Bool).to_string(), "bool[]");
    }

    #[test]
    fn test_unknown_dim_serialized_as_sentinel() {
        let t = TensorType::new(DType::F32, [UNKNOWN_DIM, 3]);
        let json = serde_json::to_string(&t).unwrap();
        assert_eq!(json, r#"{"dtype":"f32","shape":[-1,3]}"#);
    }
}
