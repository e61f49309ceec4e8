use crate::types::Vector3;
use core::fmt::{Debug, Formatter};
use core::ops::{Add, AddAssign, Mul, Neg, Sub};
use num_traits::{Float, One, Zero};
use uniform_array_derive::UniformArray;

/// A 3×3 matrix in row-major order.
///
/// Rows are `a`, `b` and `c`; columns are `1`, `2` and `3`. Index `i` addresses the
/// element in row `i / 3` and column `i % 3`.
#[derive(UniformArray, Copy)]
#[cfg_attr(test, ensure_uniform_type::ensure_uniform_type)]
#[repr(C)]
pub struct Matrix3<T> {
    pub a1: T,
    pub a2: T,
    pub a3: T,
    pub b1: T,
    pub b2: T,
    pub b3: T,
    pub c1: T,
    pub c2: T,
    pub c3: T,
}

/// A device or world axis used to remap a rotation matrix into another coordinate system.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
    MinusX,
    MinusY,
    MinusZ,
}

impl Axis {
    /// The zero-based axis index, ignoring the sign.
    #[inline]
    const fn index(self) -> usize {
        match self {
            Axis::X | Axis::MinusX => 0,
            Axis::Y | Axis::MinusY => 1,
            Axis::Z | Axis::MinusZ => 2,
        }
    }

    #[inline]
    const fn is_negative(self) -> bool {
        matches!(self, Axis::MinusX | Axis::MinusY | Axis::MinusZ)
    }
}

impl<T> Matrix3<T> {
    /// Initializes a new [`Matrix3`] instance from its elements in row-major order.
    #[inline(always)]
    #[allow(clippy::too_many_arguments)]
    pub const fn new(a1: T, a2: T, a3: T, b1: T, b2: T, b3: T, c1: T, c2: T, c3: T) -> Self {
        Self {
            a1,
            a2,
            a3,
            b1,
            b2,
            b3,
            c1,
            c2,
            c3,
        }
    }

    /// Initializes a new [`Matrix3`] instance from three row vectors.
    pub fn from_rows(a: Vector3<T>, b: Vector3<T>, c: Vector3<T>) -> Self {
        Self::new(a.x, a.y, a.z, b.x, b.y, b.z, c.x, c.y, c.z)
    }

    /// Returns the identity matrix.
    pub fn identity() -> Self
    where
        T: Zero + One,
    {
        Self::new(
            T::one(),
            T::zero(),
            T::zero(),
            T::zero(),
            T::one(),
            T::zero(),
            T::zero(),
            T::zero(),
            T::one(),
        )
    }

    /// Returns a matrix with all elements set to zero.
    pub fn zero() -> Self
    where
        T: Zero,
    {
        Self::new(
            T::zero(),
            T::zero(),
            T::zero(),
            T::zero(),
            T::zero(),
            T::zero(),
            T::zero(),
            T::zero(),
            T::zero(),
        )
    }
}

impl<T> Matrix3<T>
where
    T: Float,
{
    /// Returns the rotation about the x-axis by `angle` radians.
    pub fn rotation_x(angle: T) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self::new(
            T::one(),
            T::zero(),
            T::zero(),
            T::zero(),
            cos,
            -sin,
            T::zero(),
            sin,
            cos,
        )
    }

    /// Returns the rotation about the y-axis by `angle` radians.
    pub fn rotation_y(angle: T) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self::new(
            cos,
            T::zero(),
            sin,
            T::zero(),
            T::one(),
            T::zero(),
            -sin,
            T::zero(),
            cos,
        )
    }

    /// Returns the rotation about the z-axis by `angle` radians.
    pub fn rotation_z(angle: T) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self::new(
            cos,
            -sin,
            T::zero(),
            sin,
            cos,
            T::zero(),
            T::zero(),
            T::zero(),
            T::one(),
        )
    }

    /// Calculates the inverse through the adjugate and the determinant.
    ///
    /// Returns `None` if the absolute determinant does not exceed machine epsilon or
    /// is not finite.
    pub fn try_inverse(&self) -> Option<Self> {
        let det = self.determinant();
        if !det.is_finite() || det.abs() <= T::epsilon() {
            return None;
        }

        Some(self.adjugate() * det.recip())
    }

    /// Determines whether all elements are finite numbers.
    pub fn is_finite(&self) -> bool {
        let elements: [T; 9] = (*self).into();
        elements.iter().all(|value| value.is_finite())
    }

    /// Calculates the largest absolute element-wise difference to another matrix.
    pub fn max_abs_diff(&self, other: &Self) -> T {
        let lhs: [T; 9] = (*self).into();
        let rhs: [T; 9] = (*other).into();
        lhs.iter()
            .zip(rhs.iter())
            .fold(T::zero(), |acc, (&l, &r)| acc.max((l - r).abs()))
    }
}

impl<T> Matrix3<T>
where
    T: Copy,
{
    /// Returns the transposed matrix.
    pub fn transpose(&self) -> Self {
        Self::new(
            self.a1, self.b1, self.c1, self.a2, self.b2, self.c2, self.a3, self.b3, self.c3,
        )
    }

    /// Transposes the matrix in place.
    pub fn transpose_in_place(&mut self) {
        *self = self.transpose();
    }

    /// Calculates the determinant.
    pub fn determinant(&self) -> T
    where
        T: Mul<T, Output = T> + Add<T, Output = T> + Sub<T, Output = T>,
    {
        (self.a1 * self.b2 * self.c3) - (self.a1 * self.b3 * self.c2)
            + (self.a2 * self.b3 * self.c1)
            - (self.a2 * self.b1 * self.c3)
            + (self.a3 * self.b1 * self.c2)
            - (self.a3 * self.b2 * self.c1)
    }

    /// Calculates the adjugate, i.e. the transposed cofactor matrix.
    pub fn adjugate(&self) -> Self
    where
        T: Mul<T, Output = T> + Sub<T, Output = T>,
    {
        Self::new(
            self.b2 * self.c3 - self.b3 * self.c2,
            self.a3 * self.c2 - self.a2 * self.c3,
            self.a2 * self.b3 - self.a3 * self.b2,
            self.b3 * self.c1 - self.b1 * self.c3,
            self.a1 * self.c3 - self.a3 * self.c1,
            self.a3 * self.b1 - self.a1 * self.b3,
            self.b1 * self.c2 - self.b2 * self.c1,
            self.a2 * self.c1 - self.a1 * self.c2,
            self.a1 * self.b2 - self.a2 * self.b1,
        )
    }

    /// Rotates the coordinate system of a rotation matrix.
    ///
    /// The device axis `x` is mapped onto the world x-axis and `y` onto the world y-axis;
    /// the third axis and its sign follow from right-handedness. This matches the axis
    /// remapping commonly applied to Android rotation matrices, e.g. `remap(Axis::X,
    /// Axis::MinusZ)` for a camera looking along the device's negative z-axis.
    ///
    /// Returns `None` if both arguments name the same axis.
    pub fn remap(&self, x: Axis, y: Axis) -> Option<Self>
    where
        T: Neg<Output = T>,
    {
        let ix = x.index();
        let iy = y.index();
        if ix == iy {
            return None;
        }

        let iz = 3 - ix - iy;
        let cyclic = (ix + 1) % 3 == iy;
        let sx = x.is_negative();
        let sy = y.is_negative();
        let sz = sx ^ sy ^ !cyclic;

        let input: [T; 9] = (*self).into();
        let mut output = input;
        for row in 0..3 {
            let offset = row * 3;
            let pick = |column: usize, negate: bool| {
                let value = input[offset + column];
                if negate {
                    -value
                } else {
                    value
                }
            };
            output[offset + ix] = pick(0, sx);
            output[offset + iy] = pick(1, sy);
            output[offset + iz] = pick(2, sz);
        }

        Some(output.into())
    }
}

impl<T> Default for Matrix3<T>
where
    T: Zero + One,
{
    /// Returns the identity matrix.
    #[inline]
    fn default() -> Self {
        Self::identity()
    }
}

impl<T> Clone for Matrix3<T>
where
    T: Clone,
{
    fn clone(&self) -> Self {
        Self {
            a1: self.a1.clone(),
            a2: self.a2.clone(),
            a3: self.a3.clone(),
            b1: self.b1.clone(),
            b2: self.b2.clone(),
            b3: self.b3.clone(),
            c1: self.c1.clone(),
            c2: self.c2.clone(),
            c3: self.c3.clone(),
        }
    }
}

impl<T> Debug for Matrix3<T>
where
    T: Debug,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("Matrix3")
            .field(&[&self.a1, &self.a2, &self.a3])
            .field(&[&self.b1, &self.b2, &self.b3])
            .field(&[&self.c1, &self.c2, &self.c3])
            .finish()
    }
}

impl<T> PartialEq for Matrix3<T>
where
    T: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.a1 == other.a1
            && self.a2 == other.a2
            && self.a3 == other.a3
            && self.b1 == other.b1
            && self.b2 == other.b2
            && self.b3 == other.b3
            && self.c1 == other.c1
            && self.c2 == other.c2
            && self.c3 == other.c3
    }
}

impl<T> From<[T; 9]> for Matrix3<T> {
    #[inline]
    fn from(value: [T; 9]) -> Self {
        let [a1, a2, a3, b1, b2, b3, c1, c2, c3] = value;
        Self::new(a1, a2, a3, b1, b2, b3, c1, c2, c3)
    }
}

impl<T> From<Matrix3<T>> for [T; 9] {
    #[inline]
    fn from(value: Matrix3<T>) -> Self {
        [
            value.a1, value.a2, value.a3, value.b1, value.b2, value.b3, value.c1, value.c2,
            value.c3,
        ]
    }
}

/// Implements the matrix product.
impl<T> Mul<Matrix3<T>> for Matrix3<T>
where
    T: Copy + Mul<T, Output = T> + Add<T, Output = T>,
{
    type Output = Matrix3<T>;

    fn mul(self, rhs: Matrix3<T>) -> Self::Output {
        let m = &self;
        Self::new(
            m.a1 * rhs.a1 + m.a2 * rhs.b1 + m.a3 * rhs.c1,
            m.a1 * rhs.a2 + m.a2 * rhs.b2 + m.a3 * rhs.c2,
            m.a1 * rhs.a3 + m.a2 * rhs.b3 + m.a3 * rhs.c3,
            m.b1 * rhs.a1 + m.b2 * rhs.b1 + m.b3 * rhs.c1,
            m.b1 * rhs.a2 + m.b2 * rhs.b2 + m.b3 * rhs.c2,
            m.b1 * rhs.a3 + m.b2 * rhs.b3 + m.b3 * rhs.c3,
            m.c1 * rhs.a1 + m.c2 * rhs.b1 + m.c3 * rhs.c1,
            m.c1 * rhs.a2 + m.c2 * rhs.b2 + m.c3 * rhs.c2,
            m.c1 * rhs.a3 + m.c2 * rhs.b3 + m.c3 * rhs.c3,
        )
    }
}

/// Implements the matrix-vector product.
impl<T> Mul<Vector3<T>> for Matrix3<T>
where
    T: Copy + Mul<T, Output = T> + Add<T, Output = T>,
{
    type Output = Vector3<T>;

    fn mul(self, rhs: Vector3<T>) -> Self::Output {
        Vector3::new(
            self.a1 * rhs.x + self.a2 * rhs.y + self.a3 * rhs.z,
            self.b1 * rhs.x + self.b2 * rhs.y + self.b3 * rhs.z,
            self.c1 * rhs.x + self.c2 * rhs.y + self.c3 * rhs.z,
        )
    }
}

/// Implements the element-wise scaling.
impl<T> Mul<T> for Matrix3<T>
where
    T: Copy + Mul<T, Output = T>,
{
    type Output = Matrix3<T>;

    fn mul(self, rhs: T) -> Self::Output {
        Self::new(
            self.a1 * rhs,
            self.a2 * rhs,
            self.a3 * rhs,
            self.b1 * rhs,
            self.b2 * rhs,
            self.b3 * rhs,
            self.c1 * rhs,
            self.c2 * rhs,
            self.c3 * rhs,
        )
    }
}

/// Implements the element-wise sum.
impl<T> Add<Matrix3<T>> for Matrix3<T>
where
    T: Add<T, Output = T>,
{
    type Output = Matrix3<T>;

    fn add(self, rhs: Matrix3<T>) -> Self::Output {
        Self::new(
            self.a1 + rhs.a1,
            self.a2 + rhs.a2,
            self.a3 + rhs.a3,
            self.b1 + rhs.b1,
            self.b2 + rhs.b2,
            self.b3 + rhs.b3,
            self.c1 + rhs.c1,
            self.c2 + rhs.c2,
            self.c3 + rhs.c3,
        )
    }
}

impl<T> AddAssign<Matrix3<T>> for Matrix3<T>
where
    T: AddAssign<T>,
{
    fn add_assign(&mut self, rhs: Matrix3<T>) {
        self.a1 += rhs.a1;
        self.a2 += rhs.a2;
        self.a3 += rhs.a3;
        self.b1 += rhs.b1;
        self.b2 += rhs.b2;
        self.b3 += rhs.b3;
        self.c1 += rhs.c1;
        self.c2 += rhs.c2;
        self.c3 += rhs.c3;
    }
}
