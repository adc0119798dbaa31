//! Core Tensor type

use super::{Layout, Storage};
use crate::dtype::{DType, Element};
use crate::error::{Error, Result};
use crate::runtime::Runtime;
use std::fmt;

/// N-dimensional array stored on a compute device
///
/// `Tensor` consists of:
/// - **Storage**: Reference-counted device memory
/// - **Layout**: Shape and row-major strides
/// - **DType**: Element type (determined at runtime)
///
/// # Example
///
/// ```ignore
/// use piecewise::prelude::*;
///
/// let device = CpuDevice::new();
/// let x = Tensor::<CpuRuntime>::from_slice(&[0.0f64, 1.0, 2.0, 3.0], &[2, 2], &device);
/// assert_eq!(x.numel(), 4);
/// ```
pub struct Tensor<R: Runtime> {
    storage: Storage<R>,
    layout: Layout,
}

/// Copy a typed host vector into a byte vector with its native layout.
#[inline]
fn typed_to_bytes<T: bytemuck::NoUninit>(v: Vec<T>) -> Vec<u8> {
    bytemuck::cast_slice::<T, u8>(&v).to_vec()
}

/// Read a typed device buffer and map every element to a condition flag.
fn flags_of<R: Runtime, T: Element>(tensor: &Tensor<R>) -> Result<Vec<u8>> {
    Ok(tensor
        .try_to_vec::<T>()?
        .into_iter()
        .map(|v| u8::from(v.is_truthy()))
        .collect())
}

impl<R: Runtime> Tensor<R> {
    /// Create a tensor from storage and layout
    pub fn from_parts(storage: Storage<R>, layout: Layout) -> Self {
        Self { storage, layout }
    }

    /// Create a tensor from a slice of data
    ///
    /// # Panics
    ///
    /// Panics if `data.len()` does not equal the product of the `shape` dimensions.
    /// For a fallible alternative, use [`Self::try_from_slice`].
    pub fn from_slice<T: Element>(data: &[T], shape: &[usize], device: &R::Device) -> Self {
        Self::try_from_slice(data, shape, device).expect("Tensor::from_slice failed")
    }

    /// Create a tensor from a slice of data (fallible version)
    ///
    /// Returns an error if `data.len()` does not equal the product of the `shape` dimensions,
    /// or if memory allocation fails.
    pub fn try_from_slice<T: Element>(
        data: &[T],
        shape: &[usize],
        device: &R::Device,
    ) -> Result<Self> {
        let expected_len: usize = shape.iter().product();
        if data.len() != expected_len {
            return Err(Error::ShapeMismatch {
                expected: shape.to_vec(),
                got: vec![data.len()],
            });
        }

        let storage = Storage::from_slice(data, device)?;
        Ok(Self::from_parts(storage, Layout::contiguous(shape)))
    }

    /// Create a `Bool` tensor from host booleans
    ///
    /// # Panics
    ///
    /// Panics on a length/shape mismatch; see [`Self::try_from_bools`].
    pub fn from_bools(data: &[bool], shape: &[usize], device: &R::Device) -> Self {
        Self::try_from_bools(data, shape, device).expect("Tensor::from_bools failed")
    }

    /// Create a `Bool` tensor from host booleans (fallible version)
    pub fn try_from_bools(data: &[bool], shape: &[usize], device: &R::Device) -> Result<Self> {
        let expected_len: usize = shape.iter().product();
        if data.len() != expected_len {
            return Err(Error::ShapeMismatch {
                expected: shape.to_vec(),
                got: vec![data.len()],
            });
        }

        let bytes: Vec<u8> = data.iter().map(|&b| u8::from(b)).collect();
        let storage = Storage::from_bytes(&bytes, DType::Bool, device)?;
        Ok(Self::from_parts(storage, Layout::contiguous(shape)))
    }

    /// Create a 0-dimensional tensor holding one value
    pub fn scalar<T: Element>(value: T, device: &R::Device) -> Self {
        Self::try_from_slice(&[value], &[], device).expect("Tensor::scalar failed")
    }

    /// Create a tensor filled with zeros
    pub fn zeros(shape: &[usize], dtype: DType, device: &R::Device) -> Self {
        Self::try_zeros(shape, dtype, device).expect("Tensor::zeros failed")
    }

    /// Create a tensor filled with zeros (fallible version)
    ///
    /// Allocations are zero-initialized, and the all-zero bit pattern is zero
    /// for every supported dtype, so no fill pass is needed.
    pub fn try_zeros(shape: &[usize], dtype: DType, device: &R::Device) -> Result<Self> {
        let len: usize = shape.iter().product();
        let storage = Storage::new(len, dtype, device)?;
        Ok(Self::from_parts(storage, Layout::contiguous(shape)))
    }

    /// Create a tensor filled with a scalar value
    ///
    /// The scalar is converted to the target dtype.
    pub fn full_scalar(shape: &[usize], dtype: DType, value: f64, device: &R::Device) -> Self {
        Self::try_full_scalar(shape, dtype, value, device).expect("Tensor::full_scalar failed")
    }

    /// Create a tensor filled with a scalar value (fallible version)
    ///
    /// Integer dtypes truncate toward zero and saturate; `Bool` stores
    /// `value != 0.0`. `F16`/`BF16` need the `f16` feature.
    pub fn try_full_scalar(
        shape: &[usize],
        dtype: DType,
        value: f64,
        device: &R::Device,
    ) -> Result<Self> {
        let len: usize = shape.iter().product();
        if len == 0 {
            return Self::try_zeros(shape, dtype, device);
        }

        // Build with the element type's own alignment, then view as bytes.
        let bytes: Vec<u8> = match dtype {
            DType::F64 => typed_to_bytes(vec![value; len]),
            DType::F32 => typed_to_bytes(vec![f32::from_f64(value); len]),
            #[cfg(feature = "f16")]
            DType::F16 => typed_to_bytes(vec![half::f16::from_f64(value); len]),
            #[cfg(feature = "f16")]
            DType::BF16 => typed_to_bytes(vec![half::bf16::from_f64(value); len]),
            #[cfg(not(feature = "f16"))]
            DType::F16 | DType::BF16 => {
                return Err(Error::unsupported_dtype(dtype, "full_scalar"));
            }
            DType::I64 => typed_to_bytes(vec![i64::from_f64(value); len]),
            DType::I32 => typed_to_bytes(vec![i32::from_f64(value); len]),
            DType::I16 => typed_to_bytes(vec![i16::from_f64(value); len]),
            DType::I8 => typed_to_bytes(vec![i8::from_f64(value); len]),
            DType::U64 => typed_to_bytes(vec![u64::from_f64(value); len]),
            DType::U32 => typed_to_bytes(vec![u32::from_f64(value); len]),
            DType::U16 => typed_to_bytes(vec![u16::from_f64(value); len]),
            DType::U8 => vec![u8::from_f64(value); len],
            DType::Bool => vec![u8::from(value != 0.0); len],
        };

        let storage = Storage::from_bytes(&bytes, dtype, device)?;
        Ok(Self::from_parts(storage, Layout::contiguous(shape)))
    }

    // ===== Accessors =====

    /// Get the storage
    #[inline]
    pub fn storage(&self) -> &Storage<R> {
        &self.storage
    }

    /// Get the shape
    #[inline]
    pub fn shape(&self) -> &[usize] {
        self.layout.shape()
    }

    /// Get the total number of elements
    #[inline]
    pub fn numel(&self) -> usize {
        self.layout.elem_count()
    }

    /// Get the element type
    #[inline]
    pub fn dtype(&self) -> DType {
        self.storage.dtype()
    }

    /// Get the device
    #[inline]
    pub fn device(&self) -> &R::Device {
        self.storage.device()
    }

    /// Check if this is a scalar (0-dimensional tensor)
    #[inline]
    pub fn is_scalar(&self) -> bool {
        self.layout.is_scalar()
    }

    // ===== Host transfer =====

    /// Copy the tensor's elements to a host vector
    ///
    /// # Panics
    ///
    /// Panics if `T` does not match the tensor's element size or the device
    /// copy fails. See [`Self::try_to_vec`].
    pub fn to_vec<T: bytemuck::Pod>(&self) -> Vec<T> {
        self.try_to_vec().expect("Tensor::to_vec failed")
    }

    /// Copy the tensor's elements to a host vector (fallible version)
    pub fn try_to_vec<T: bytemuck::Pod>(&self) -> Result<Vec<T>> {
        if std::mem::size_of::<T>() != self.dtype().size_in_bytes() {
            return Err(Error::InvalidArgument {
                arg: "T",
                reason: format!(
                    "element size {} does not match dtype {}",
                    std::mem::size_of::<T>(),
                    self.dtype()
                ),
            });
        }

        // Allocate with T's alignment, then copy through a byte view.
        let mut result = vec![T::zeroed(); self.numel()];
        let bytes: &mut [u8] = bytemuck::cast_slice_mut(&mut result);
        R::copy_from_device(self.storage.ptr(), bytes, self.storage.device())?;
        Ok(result)
    }

    /// Read the tensor as condition flags: one `u8` per element, 1 where the
    /// element is non-zero
    pub fn to_flags(&self) -> Result<Vec<u8>> {
        match self.dtype() {
            DType::F64 => flags_of::<R, f64>(self),
            DType::F32 => flags_of::<R, f32>(self),
            #[cfg(feature = "f16")]
            DType::F16 => flags_of::<R, half::f16>(self),
            #[cfg(feature = "f16")]
            DType::BF16 => flags_of::<R, half::bf16>(self),
            // Zero in both half formats is every bit clear except the sign.
            #[cfg(not(feature = "f16"))]
            DType::F16 | DType::BF16 => Ok(self
                .try_to_vec::<u16>()?
                .into_iter()
                .map(|bits| u8::from(bits & 0x7fff != 0))
                .collect()),
            DType::I64 => flags_of::<R, i64>(self),
            DType::I32 => flags_of::<R, i32>(self),
            DType::I16 => flags_of::<R, i16>(self),
            DType::I8 => flags_of::<R, i8>(self),
            DType::U64 => flags_of::<R, u64>(self),
            DType::U32 => flags_of::<R, u32>(self),
            DType::U16 => flags_of::<R, u16>(self),
            DType::U8 | DType::Bool => flags_of::<R, u8>(self),
        }
    }
}

impl<R: Runtime> Clone for Tensor<R> {
    /// Clone creates a new tensor sharing the same storage (zero-copy)
    fn clone(&self) -> Self {
        Self {
            storage: self.storage.clone(),
            layout: self.layout.clone(),
        }
    }
}

impl<R: Runtime> fmt::Debug for Tensor<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tensor")
            .field("shape", &self.shape())
            .field("dtype", &self.dtype())
            .finish()
    }
}

impl<R: Runtime> fmt::Display for Tensor<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tensor({:?}, dtype={})", self.shape(), self.dtype())
    }
}
