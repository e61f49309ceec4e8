/// Declares a three-axis sensor reading type.
///
/// The generated type is `#[repr(C)]`, indexable through [`UniformArray`](uniform_array_derive::UniformArray)
/// and converts from and into [`Vector3`](crate::types::Vector3) and `[T; 3]`.
#[macro_export]
macro_rules! sensor_reading {
    ($(#[$meta:meta])* $type_name:ident, $unit:literal) => {
        $(#[$meta])*
        #[derive(::uniform_array_derive::UniformArray, Copy)]
        #[cfg_attr(test, ::ensure_uniform_type::ensure_uniform_type)]
        #[repr(C)]
        pub struct $type_name<T> {
            #[doc = concat!("The component along the device x-axis, in ", $unit, ".")]
            pub x: T,
            #[doc = concat!("The component along the device y-axis, in ", $unit, ".")]
            pub y: T,
            #[doc = concat!("The component along the device z-axis, in ", $unit, ".")]
            pub z: T,
        }

        impl<T> $type_name<T> {
            #[doc = concat!("Initializes a new [`", stringify!($type_name), "`] instance.")]
            #[inline(always)]
            pub const fn new(x: T, y: T, z: T) -> Self {
                Self { x, y, z }
            }

            /// Determines whether all components are finite numbers.
            #[inline]
            pub fn is_finite(&self) -> bool
            where
                T: ::num_traits::Float,
            {
                self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
            }

            #[doc = concat!("Constructs a new [`", stringify!($type_name), "`] from a reading in a given coordinate frame.")]
            #[cfg(feature = "coordinate-frame")]
            #[cfg_attr(docsrs, doc(cfg(feature = "coordinate-frame")))]
            pub fn from_ned<C>(coordinate: C) -> Self
            where
                C: Into<::coordinate_frame::NorthEastDown<T>>,
                T: Clone,
            {
                let coordinate = coordinate.into();
                Self {
                    x: coordinate.x(),
                    y: coordinate.y(),
                    z: coordinate.z(),
                }
            }
        }

        impl<T> Default for $type_name<T>
        where
            T: Default,
        {
            #[inline]
            fn default() -> Self {
                Self::new(Default::default(), Default::default(), Default::default())
            }
        }

        impl<T> Clone for $type_name<T>
        where
            T: Clone,
        {
            fn clone(&self) -> Self {
                Self {
                    x: self.x.clone(),
                    y: self.y.clone(),
                    z: self.z.clone(),
                }
            }
        }

        impl<T> core::fmt::Debug for $type_name<T>
        where
            T: core::fmt::Debug,
        {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.debug_tuple(stringify!($type_name))
                    .field(&self.x)
                    .field(&self.y)
                    .field(&self.z)
                    .finish()
            }
        }

        impl<T> From<[T; 3]> for $type_name<T> {
            #[inline]
            fn from(value: [T; 3]) -> Self {
                let [x, y, z] = value;
                Self { x, y, z }
            }
        }

        impl<T> From<$type_name<T>> for [T; 3] {
            #[inline]
            fn from(value: $type_name<T>) -> Self {
                [value.x, value.y, value.z]
            }
        }

        impl<T> From<$type_name<T>> for $crate::types::Vector3<T> {
            #[inline]
            fn from(value: $type_name<T>) -> Self {
                $crate::types::Vector3::new(value.x, value.y, value.z)
            }
        }

        impl<T> From<&$type_name<T>> for $crate::types::Vector3<T>
        where
            T: Clone,
        {
            #[inline]
            fn from(value: &$type_name<T>) -> Self {
                $crate::types::Vector3::new(value.x.clone(), value.y.clone(), value.z.clone())
            }
        }

        #[cfg(test)]
        ::paste::paste! {
            #[cfg(test)]
            mod [<tests_gen_ $type_name:snake>] {
                use super::*;

                #[test]
                fn test_len() {
                    let reading = $type_name::<f32>::default();
                    assert_eq!(reading.len(), 3);
                }

                #[test]
                fn test_index() {
                    let reading = $type_name::<f32>::new(1.0, 2.0, 3.0);
                    assert_eq!(reading[0], 1.0);
                    assert_eq!(reading[1], 2.0);
                    assert_eq!(reading[2], 3.0);
                }

                #[test]
                fn test_array_conversions() {
                    let reading = $type_name::<f32>::from([4.0, 5.0, 6.0]);
                    let vector = $crate::types::Vector3::from(reading);
                    assert_eq!((vector.x, vector.y, vector.z), (4.0, 5.0, 6.0));
                    assert_eq!(<[f32; 3]>::from(reading), [4.0, 5.0, 6.0]);
                }

                #[test]
                fn test_is_finite() {
                    assert!($type_name::new(0.0_f32, 1.0, 2.0).is_finite());
                    assert!(!$type_name::new(f32::NAN, 1.0, 2.0).is_finite());
                    assert!(!$type_name::new(0.0_f32, f32::INFINITY, 2.0).is_finite());
                }
            }
        }
    };
}
