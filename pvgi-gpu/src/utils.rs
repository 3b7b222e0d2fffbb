use core::ops;

pub fn lerp<T>(a: T, b: T, t: f32) -> T
where
    T: ops::Add<Output = T>,
    T: ops::Sub<Output = T>,
    T: ops::Mul<f32, Output = T>,
    T: Copy,
{
    a + (b - a) * t.clamp(0.0, 1.0)
}

pub trait F32Ext
where
    Self: Sized,
{
    fn saturate(self) -> Self;
}

impl F32Ext for f32 {
    fn saturate(self) -> Self {
        self.clamp(0.0, 1.0)
    }
}
