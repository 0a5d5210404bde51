#![cfg(test)]

use num_complex::Complex64;

use super::field::{ComplexField, Dims};

#[test]
fn zeros_initializes_all_entries_to_zero() {
    let dims = Dims::new(2, 3);
    let field = ComplexField::zeros(dims);
    assert_eq!(field.len(), dims.len());
    assert!(
        field
            .as_slice()
            .iter()
            .all(|value| *value == Complex64::new(0.0, 0.0))
    );
}

#[test]
#[should_panic(expected = "data length must match field dimensions")]
fn from_vec_rejects_mismatched_lengths() {
    let dims = Dims::new(2, 2);
    let data = vec![Complex64::default(); dims.len() - 1];
    let _ = ComplexField::from_vec(dims, data);
}

#[test]
fn idx_follows_row_major_convention() {
    let dims = Dims::new(3, 2);
    assert_eq!(dims.idx(0, 0), 0);
    assert_eq!(dims.idx(2, 0), 2);
    assert_eq!(dims.idx(0, 1), 3);
    assert_eq!(dims.idx(2, 1), 5);
}

#[test]
fn get_and_get_mut_operate_on_correct_cell() {
    let dims = Dims::new(3, 2);
    let mut field = ComplexField::zeros(dims);
    for iy in 0..dims.ny {
        for ix in 0..dims.nx {
            *field.get_mut(ix, iy) = Complex64::new(ix as f64, iy as f64);
        }
    }
    assert_eq!(*field.get(0, 0), Complex64::new(0.0, 0.0));
    assert_eq!(*field.get(2, 1), Complex64::new(2.0, 1.0));
}

#[test]
fn add_assign_sums_element_wise() {
    let dims = Dims::new(2, 2);
    let mut a = ComplexField::zeros(dims);
    let mut b = ComplexField::zeros(dims);
    for (idx, value) in a.as_mut_slice().iter_mut().enumerate() {
        *value = Complex64::new(idx as f64, 0.0);
    }
    for (idx, value) in b.as_mut_slice().iter_mut().enumerate() {
        *value = Complex64::new(0.0, -(idx as f64));
    }
    a.add_assign(&b);
    for (idx, value) in a.as_slice().iter().enumerate() {
        assert_eq!(*value, Complex64::new(idx as f64, -(idx as f64)));
    }
}

#[test]
#[should_panic(expected = "field dimensions must match")]
fn add_assign_rejects_mismatched_dims() {
    let mut a = ComplexField::zeros(Dims::new(2, 2));
    let b = ComplexField::zeros(Dims::new(2, 3));
    a.add_assign(&b);
}

#[test]
fn field_into_vec_returns_storage() {
    let dims = Dims::new(2, 2);
    let data: Vec<_> = (0..dims.len())
        .map(|idx| Complex64::new(idx as f64, -(idx as f64)))
        .collect();
    let field = ComplexField::from_vec(dims, data.clone());
    let recovered: Vec<Complex64> = field.into();
    assert_eq!(recovered, data);
}
