use num_traits::Float;

pub fn mean<T: Float>(xs: &[T]) -> T {
    if xs.is_empty() {
        return T::zero();
    }

    let sum = xs.iter().fold(T::zero(), |acc, &x| acc + x);

    sum / T::from(xs.len()).unwrap()
}

/// Median with the middle pair averaged for even lengths. Sorts in place.
pub fn median<T: Float>(xs: &mut [T]) -> T {
    if xs.is_empty() {
        return T::zero();
    }

    xs.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let mid = xs.len() / 2;

    if xs.len() % 2 == 0 {
        (xs[mid - 1] + xs[mid]) / T::from(2).unwrap()
    } else {
        xs[mid]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_of_slice() {
        assert_eq!(mean::<f32>(&[]), 0.0);
        assert_eq!(mean(&[2.0f32, 4.0, 6.0]), 4.0);
    }

    #[test]
    fn median_odd_and_even() {
        assert_eq!(median(&mut [3.0f32, 1.0, 2.0]), 2.0);
        assert_eq!(median(&mut [4.0f32, 1.0, 3.0, 2.0]), 2.5);
        assert_eq!(median::<f32>(&mut []), 0.0);
    }
}
