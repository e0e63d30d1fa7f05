//! Property tests for parameter layouts and the derivative checker.

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use spca_core::{
    cost_function::{CostFunction, DerivativeChecker, QuadraticCost},
    layout::ParameterLayout,
    types::DVector,
};

fn layout_from(sizes: &[usize]) -> ParameterLayout {
    const NAMES: [&str; 4] = ["u", "v", "w", "z"];
    sizes
        .iter()
        .zip(NAMES)
        .fold(ParameterLayout::new(), |layout, (&len, name)| {
            layout.with_block(name, len)
        })
}

proptest! {
    #[test]
    fn blocks_tile_the_flat_vector(sizes in prop::collection::vec(1usize..12, 1..=4)) {
        let layout = layout_from(&sizes);
        prop_assert_eq!(layout.total_len(), sizes.iter().sum::<usize>());

        let mut expected_offset = 0;
        for (block, &len) in layout.blocks().iter().zip(&sizes) {
            prop_assert_eq!(block.offset, expected_offset);
            prop_assert_eq!(block.len, len);
            expected_offset += len;
        }
    }

    #[test]
    fn split_and_join_preserve_entries(
        sizes in prop::collection::vec(1usize..8, 1..=4),
        seed in any::<u64>(),
    ) {
        use rand::{rngs::StdRng, SeedableRng};

        let layout = layout_from(&sizes);
        let point: DVector<f64> = layout.random_point(&mut StdRng::seed_from_u64(seed));
        let parts = layout.split(&point).unwrap();

        prop_assert_eq!(parts.len(), sizes.len());
        for (i, part) in parts.iter().enumerate() {
            prop_assert_eq!(part, &layout.view(&point, i).into_owned());
        }
        prop_assert_eq!(layout.join(&parts).unwrap(), point);
    }

    #[test]
    fn quadratic_gradient_passes_the_checker(
        target in prop::collection::vec(-10.0f64..10.0, 1..20),
        shift in -5.0f64..5.0,
    ) {
        let target = DVector::from_vec(target);
        let point = target.add_scalar(shift);
        let cost = QuadraticCost::new(target);

        let gradient = cost.gradient(&point).unwrap();
        prop_assert!((gradient.norm() - shift.abs() * (point.len() as f64).sqrt()).abs() < 1e-9);

        let check = DerivativeChecker::check_gradient(&cost, &point).unwrap();
        prop_assert!(check.passes(1e-5), "max relative error {}", check.max_rel_error);
    }
}

#[test]
fn wrong_lengths_are_rejected() {
    let layout = layout_from(&[3, 2]);
    assert!(layout.validate(&DVector::<f64>::zeros(4)).is_err());
    assert!(layout.split(&DVector::<f64>::zeros(6)).is_err());
    assert!(layout
        .join(&[DVector::<f64>::zeros(3), DVector::zeros(3)])
        .is_err());
    assert!(layout.validate(&DVector::<f64>::zeros(5)).is_ok());

    let parts = layout
        .split(&DVector::from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0]))
        .unwrap();
    assert_eq!(parts[1], DVector::from_vec(vec![4.0, 5.0]));
}
