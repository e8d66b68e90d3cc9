use std::borrow::Cow;
use std::rc::Rc;
use std::sync::Arc;

/// A value that can be written as a single CSV field.
///
/// Implementations append the value's text representation to `buf`. The
/// writer decides afterwards whether the text needs quoting, so
/// implementations never quote or escape anything themselves.
///
/// Integers are rendered with `itoa` and floats with `ryu`, so no
/// intermediate `String` is allocated. Floats use the shortest
/// representation that round trips, always with a fractional part
/// (`1.0`, not `1`). Non-finite floats are written as `NaN`, `inf` and
/// `-inf`.
///
/// # Example
///
/// ```
/// let mut wtr = rowcsv::Writer::from_writer(vec![]);
/// wtr.write_record(&[&1u32 as &dyn rowcsv::ToField, &"x", &2.5f64, &true])?;
/// let data = String::from_utf8(wtr.into_inner()?).unwrap();
/// assert_eq!(data, "1,x,2.5,true\n");
/// # Ok::<(), rowcsv::Error>(())
/// ```
pub trait ToField {
    /// Append this value's text to `buf`.
    fn write_field(&self, buf: &mut Vec<u8>);
}

impl ToField for str {
    #[inline]
    fn write_field(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(self.as_bytes());
    }
}

impl ToField for String {
    #[inline]
    fn write_field(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(self.as_bytes());
    }
}

impl<'a> ToField for Cow<'a, str> {
    #[inline]
    fn write_field(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(self.as_bytes());
    }
}

impl ToField for char {
    fn write_field(&self, buf: &mut Vec<u8>) {
        let mut tmp = [0; 4];
        buf.extend_from_slice(self.encode_utf8(&mut tmp).as_bytes());
    }
}

impl ToField for bool {
    fn write_field(&self, buf: &mut Vec<u8>) {
        let s = if *self { "true" } else { "false" };
        buf.extend_from_slice(s.as_bytes());
    }
}

macro_rules! impl_integer {
    ($($ty:ty),*) => {
        $(
            impl ToField for $ty {
                #[inline]
                fn write_field(&self, buf: &mut Vec<u8>) {
                    let mut tmp = itoa::Buffer::new();
                    buf.extend_from_slice(tmp.format(*self).as_bytes());
                }
            }
        )*
    };
}

impl_integer!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize);

macro_rules! impl_float {
    ($($ty:ty),*) => {
        $(
            impl ToField for $ty {
                #[inline]
                fn write_field(&self, buf: &mut Vec<u8>) {
                    let mut tmp = ryu::Buffer::new();
                    buf.extend_from_slice(tmp.format(*self).as_bytes());
                }
            }
        )*
    };
}

impl_float!(f32, f64);

impl<'a, T: ToField + ?Sized> ToField for &'a T {
    #[inline]
    fn write_field(&self, buf: &mut Vec<u8>) {
        (**self).write_field(buf)
    }
}

impl<T: ToField + ?Sized> ToField for Box<T> {
    #[inline]
    fn write_field(&self, buf: &mut Vec<u8>) {
        (**self).write_field(buf)
    }
}

impl<T: ToField + ?Sized> ToField for Rc<T> {
    #[inline]
    fn write_field(&self, buf: &mut Vec<u8>) {
        (**self).write_field(buf)
    }
}

impl<T: ToField + ?Sized> ToField for Arc<T> {
    #[inline]
    fn write_field(&self, buf: &mut Vec<u8>) {
        (**self).write_field(buf)
    }
}
