//! Element trait for mapping Rust types to DType

use super::DType;
use bytemuck::{Pod, Zeroable};

/// Trait for types that can be elements of a tensor
///
/// This trait connects Rust's type system to the runtime dtype system.
///
/// # Bounds
/// - `Copy + Send + Sync + 'static` - values move freely between worker threads
/// - `Pod + Zeroable` - safe byte views for storage copies (bytemuck)
///
/// Arithmetic is not required: piecewise evaluation only moves values, it
/// never combines them.
pub trait Element: Copy + Send + Sync + Pod + Zeroable + 'static {
    /// The corresponding DType for this Rust type
    const DTYPE: DType;

    /// Convert to f64 for generic numeric handling
    fn to_f64(self) -> f64;

    /// Convert from f64 to this type
    ///
    /// Integer targets truncate toward zero and saturate at the type bounds
    /// (NaN maps to 0), matching `as` casts.
    fn from_f64(v: f64) -> Self;

    /// Truth value of an element used as a condition: non-zero is true
    #[inline]
    fn is_truthy(self) -> bool {
        self.to_f64() != 0.0
    }
}

macro_rules! impl_element_primitive {
    ($($ty:ty => $dtype:ident, $zero:expr);* $(;)?) => {
        $(
            impl Element for $ty {
                const DTYPE: DType = DType::$dtype;

                #[inline]
                fn to_f64(self) -> f64 {
                    self as f64
                }

                #[inline]
                fn from_f64(v: f64) -> Self {
                    v as $ty
                }

                #[inline]
                fn is_truthy(self) -> bool {
                    self != $zero
                }
            }
        )*
    };
}

impl_element_primitive! {
    f64 => F64, 0.0;
    f32 => F32, 0.0;
    i64 => I64, 0;
    i32 => I32, 0;
    i16 => I16, 0;
    i8 => I8, 0;
    u64 => U64, 0;
    u32 => U32, 0;
    u16 => U16, 0;
    u8 => U8, 0;
}

// Note: bool doesn't implement Pod, so Bool tensors are stored as u8 and read
// through the u8 impl above.

#[cfg(feature = "f16")]
impl Element for half::f16 {
    const DTYPE: DType = DType::F16;

    #[inline]
    fn to_f64(self) -> f64 {
        half::f16::to_f64(self)
    }

    #[inline]
    fn from_f64(v: f64) -> Self {
        half::f16::from_f64(v)
    }
}

#[cfg(feature = "f16")]
impl Element for half::bf16 {
    const DTYPE: DType = DType::BF16;

    #[inline]
    fn to_f64(self) -> f64 {
        half::bf16::to_f64(self)
    }

    #[inline]
    fn from_f64(v: f64) -> Self {
        half::bf16::from_f64(v)
    }
}
