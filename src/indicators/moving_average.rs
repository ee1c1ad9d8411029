/// Calculate an Exponential Moving Average (EMA) series
///
/// The output is index-aligned with `prices` and has the same length.
/// The first value is seeded with the first price rather than an SMA
/// warm-up window, so early values are not a true EMA.
///
/// Returns an empty vector for empty input.
///
/// `period` should be at least 1. A period of 0 is accepted and gives a
/// multiplier of 2.0, so every step overshoots the price; configured
/// periods are rejected earlier by `MacdConfig::validate`.
pub fn calculate_ema_series(prices: &[f64], period: usize) -> Vec<f64> {
    let Some(&seed) = prices.first() else {
        return Vec::new();
    };

    let multiplier = 2.0 / (period as f64 + 1.0);

    let mut ema = Vec::with_capacity(prices.len());
    ema.push(seed);

    let mut prev = seed;
    for price in &prices[1..] {
        prev = (price - prev) * multiplier + prev;
        ema.push(prev);
    }

    ema
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ema_known_values() {
        // period 3 => multiplier 0.5
        let prices = vec![100.0, 102.0, 101.0, 103.0];
        let ema = calculate_ema_series(&prices, 3);
        assert_eq!(ema, vec![100.0, 101.0, 101.0, 102.0]);
    }

    #[test]
    fn test_ema_seeded_with_first_price() {
        let prices = vec![42.5, 40.0, 45.0, 47.25, 39.0];
        for period in [1, 2, 9, 12, 26, 200] {
            let ema = calculate_ema_series(&prices, period);
            assert_eq!(ema[0], 42.5);
            assert_eq!(ema.len(), prices.len());
        }
    }

    #[test]
    fn test_ema_flat_input_stays_flat() {
        let prices = vec![7.25; 30];
        for period in [1, 5, 12, 26] {
            let ema = calculate_ema_series(&prices, period);
            assert!(ema.iter().all(|&v| v == 7.25));
        }
    }

    #[test]
    fn test_ema_empty_input() {
        assert!(calculate_ema_series(&[], 12).is_empty());
    }

    #[test]
    fn test_ema_single_price() {
        assert_eq!(calculate_ema_series(&[3.0], 12), vec![3.0]);
    }

    #[test]
    fn test_ema_period_one_tracks_price() {
        // multiplier 1.0 => EMA equals the input
        let prices = vec![1.0, 5.0, 2.0, 8.0];
        assert_eq!(calculate_ema_series(&prices, 1), prices);
    }

    #[test]
    fn test_ema_period_zero_overshoots() {
        // multiplier 2.0: 10 + (12 - 10) * 2 = 14
        assert_eq!(calculate_ema_series(&[10.0, 12.0], 0), vec![10.0, 14.0]);
    }

    #[test]
    fn test_ema_lags_rising_prices() {
        let prices: Vec<f64> = (0..20).map(|i| 100.0 + i as f64).collect();
        let ema = calculate_ema_series(&prices, 5);
        let last = *ema.last().unwrap();
        assert!(last < 119.0 && last > 100.0);
    }
}
