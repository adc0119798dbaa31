//! CPU runtime and device

use super::client::CpuClient;
use crate::error::{Error, Result};
use crate::runtime::{Device, Runtime};
use std::alloc::{Layout as AllocLayout, alloc_zeroed, dealloc};

/// Alignment of every CPU buffer; wide enough for AVX-512 loads
const CPU_ALIGN: usize = 64;

/// CPU device (the host; there is exactly one)
#[derive(Clone, Debug, Default)]
pub struct CpuDevice {
    id: usize,
}

impl CpuDevice {
    /// Create a handle to the host device
    pub fn new() -> Self {
        Self { id: 0 }
    }
}

impl Device for CpuDevice {
    fn id(&self) -> usize {
        self.id
    }

    fn name(&self) -> String {
        "cpu".to_string()
    }
}

/// CPU compute runtime
///
/// Memory is allocated on the heap with the system allocator; handles are
/// host pointers cast to `u64`.
#[derive(Clone, Debug, Default)]
pub struct CpuRuntime;

fn host_layout(size_bytes: usize) -> Result<AllocLayout> {
    AllocLayout::from_size_align(size_bytes, CPU_ALIGN).map_err(|e| Error::InvalidArgument {
        arg: "size_bytes",
        reason: e.to_string(),
    })
}

impl Runtime for CpuRuntime {
    type Device = CpuDevice;
    type Client = CpuClient;

    fn name() -> &'static str {
        "cpu"
    }

    fn allocate(size_bytes: usize, _device: &Self::Device) -> Result<u64> {
        if size_bytes == 0 {
            return Ok(0);
        }

        let layout = host_layout(size_bytes)?;
        // SAFETY: layout has non-zero size.
        let ptr = unsafe { alloc_zeroed(layout) };
        if ptr.is_null() {
            return Err(Error::OutOfMemory { size: size_bytes });
        }

        Ok(ptr as u64)
    }

    fn deallocate(ptr: u64, size_bytes: usize, _device: &Self::Device) {
        if ptr == 0 || size_bytes == 0 {
            return;
        }

        // The same layout succeeded at allocation time.
        if let Ok(layout) = host_layout(size_bytes) {
            // SAFETY: ptr came from `allocate` with this exact layout.
            unsafe { dealloc(ptr as *mut u8, layout) };
        }
    }

    fn copy_to_device(src: &[u8], dst: u64, _device: &Self::Device) -> Result<()> {
        if src.is_empty() {
            return Ok(());
        }
        if dst == 0 {
            return Err(Error::Internal("copy_to_device: null destination".into()));
        }

        // SAFETY: dst was allocated with at least src.len() bytes by the caller.
        unsafe {
            std::ptr::copy_nonoverlapping(src.as_ptr(), dst as *mut u8, src.len());
        }
        Ok(())
    }

    fn copy_from_device(src: u64, dst: &mut [u8], _device: &Self::Device) -> Result<()> {
        if dst.is_empty() {
            return Ok(());
        }
        if src == 0 {
            return Err(Error::Internal("copy_from_device: null source".into()));
        }

        // SAFETY: src holds at least dst.len() initialized bytes.
        unsafe {
            std::ptr::copy_nonoverlapping(src as *const u8, dst.as_mut_ptr(), dst.len());
        }
        Ok(())
    }

    fn default_device() -> Self::Device {
        CpuDevice::new()
    }

    fn default_client(device: &Self::Device) -> Self::Client {
        CpuClient::new(device.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocate_copy_roundtrip() {
        let device = CpuDevice::new();
        let data: Vec<u8> = vec![1, 2, 3, 4, 5, 6, 7, 8];

        let ptr = CpuRuntime::allocate(data.len(), &device).unwrap();
        assert_ne!(ptr, 0);
        assert_eq!(ptr as usize % CPU_ALIGN, 0);
        CpuRuntime::copy_to_device(&data, ptr, &device).unwrap();

        let mut result = vec![0u8; data.len()];
        CpuRuntime::copy_from_device(ptr, &mut result, &device).unwrap();
        assert_eq!(data, result);

        CpuRuntime::deallocate(ptr, data.len(), &device);
    }

    #[test]
    fn test_zero_allocation() {
        let device = CpuDevice::new();
        let ptr = CpuRuntime::allocate(0, &device).unwrap();
        assert_eq!(ptr, 0);
        CpuRuntime::deallocate(ptr, 0, &device);
    }

    #[test]
    fn test_allocation_is_zeroed() {
        let device = CpuDevice::new();
        let ptr = CpuRuntime::allocate(32, &device).unwrap();
        let mut out = vec![0xffu8; 32];
        CpuRuntime::copy_from_device(ptr, &mut out, &device).unwrap();
        assert!(out.iter().all(|&b| b == 0));
        CpuRuntime::deallocate(ptr, 32, &device);
    }

    #[test]
    fn test_null_copy_is_rejected() {
        let device = CpuDevice::new();
        assert!(CpuRuntime::copy_to_device(&[1, 2], 0, &device).is_err());
    }
}
