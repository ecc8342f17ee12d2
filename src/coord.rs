use num::Num;

/// One axis of a rectangle, `min` inclusive. Invariant: `max > min`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Axis<T> {
    pub min: T,
    pub max: T,
}

impl<T> Axis<T>
where
    T: Num + Copy,
{
    pub fn new(min: T, max: T) -> Self {
        Self { min, max }
    }

    pub fn length(&self) -> T {
        self.max - self.min
    }

    pub fn center(&self) -> T {
        (self.max + self.min) / (T::one() + T::one())
    }
}

/// A rectangular region of the complex plane: `x` spans the real axis,
/// `y` the imaginary axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Frame<T> {
    pub x: Axis<T>,
    pub y: Axis<T>,
}

impl<T> Frame<T>
where
    T: Num + Copy,
{
    pub fn new(x: Axis<T>, y: Axis<T>) -> Self {
        Self { x, y }
    }

    pub fn from_nums(x1: T, x2: T, y1: T, y2: T) -> Self {
        Self::new(Axis::new(x1, x2), Axis::new(y1, y2))
    }

    pub fn aspect_ratio(&self) -> T {
        self.x.length() / self.y.length()
    }
}

/// The whole Mandelbrot set with a 3:2 aspect ratio.
impl Default for Frame<f64> {
    fn default() -> Self {
        Self::new(Axis::new(-2.0, 1.0), Axis::new(-1.0, 1.0))
    }
}

/// Pixel dimensions of an image or tile buffer, anchored at the origin.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Resolution {
    pub width: usize,
    pub height: usize,
}

impl Resolution {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    pub fn pixels(&self) -> usize {
        self.width * self.height
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_axis_length_and_center() {
        let axis = Axis::new(-2.0, 1.0);
        assert_eq!(axis.length(), 3.0);
        assert_eq!(axis.center(), -0.5);
    }

    #[test]
    fn test_default_frame_aspect_ratio() {
        assert_eq!(Frame::<f64>::default().aspect_ratio(), 1.5);
    }

    #[test]
    fn test_resolution_pixels() {
        assert_eq!(Resolution::new(450, 300).pixels(), 135_000);
    }
}
