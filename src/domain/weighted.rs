// Weighted random selection over labelled categories
use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightedItem<T> {
    pub value: T,
    pub weight: f64,
}

impl<T> WeightedItem<T> {
    pub const fn new(value: T, weight: f64) -> Self {
        Self { value, weight }
    }
}

/// Pick one item with probability proportional to its weight.
///
/// One uniform draw is scaled to the total weight, then weights are
/// subtracted in order until the remainder is no longer positive. When every
/// weight is zero the first item wins. Negative weights count as zero.
pub fn pick_weighted<'a, T, R>(items: &'a [WeightedItem<T>], rng: &mut R) -> Option<&'a T>
where
    R: Rng + ?Sized,
{
    let first = items.first()?;
    let total: f64 = items.iter().map(|item| item.weight.max(0.0)).sum();
    let mut remaining = rng.r#gen::<f64>() * total;

    for item in items {
        remaining -= item.weight.max(0.0);
        if remaining <= 0.0 {
            return Some(&item.value);
        }
    }

    Some(&first.value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_zero_weight_never_picked() {
        let items = [WeightedItem::new("A", 100.0), WeightedItem::new("B", 0.0)];
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            assert_eq!(pick_weighted(&items, &mut rng), Some(&"A"));
        }
    }

    #[test]
    fn test_all_zero_weights_pick_first() {
        let items = [WeightedItem::new("A", 0.0), WeightedItem::new("B", 0.0)];
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            assert_eq!(pick_weighted(&items, &mut rng), Some(&"A"));
        }
    }

    #[test]
    fn test_empty_items() {
        let items: [WeightedItem<&str>; 0] = [];
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(pick_weighted(&items, &mut rng), None);
    }

    #[test]
    fn test_negative_weight_treated_as_zero() {
        let items = [WeightedItem::new("A", -50.0), WeightedItem::new("B", 10.0)];
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..1000 {
            assert_eq!(pick_weighted(&items, &mut rng), Some(&"B"));
        }
    }

    #[test]
    fn test_distribution_follows_weights() {
        let items = [WeightedItem::new("A", 75.0), WeightedItem::new("B", 25.0)];
        let mut rng = StdRng::seed_from_u64(42);
        let picks_a = (0..10_000)
            .filter(|_| pick_weighted(&items, &mut rng) == Some(&"A"))
            .count();
        assert!((7_000..8_000).contains(&picks_a), "picked A {} times", picks_a);
    }
}
