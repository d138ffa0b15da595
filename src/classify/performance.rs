// src/classify/performance.rs

pub fn performance_color(score: f64) -> &'static str {
    if score >= 90.0 {
        "#22c55e" // verde
    } else if score >= 80.0 {
        "#eab308" // amarillo
    } else if score >= 70.0 {
        "#f97316" // naranja
    } else {
        "#ef4444" // rojo
    }
}

pub fn performance_tier(score: f64) -> &'static str {
    if score >= 90.0 {
        "Excelente"
    } else if score >= 80.0 {
        "Bueno"
    } else if score >= 70.0 {
        "Regular"
    } else {
        "Necesita Mejora"
    }
}

/// Map marker radius, 6..=14 px.
pub fn marker_size(score: f64) -> f64 {
    (6.0 + (score / 100.0) * 8.0).clamp(6.0, 14.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thresholds_are_inclusive() {
        assert_eq!(performance_color(90.0), "#22c55e");
        assert_eq!(performance_color(89.99), "#eab308");
        assert_eq!(performance_color(70.0), "#f97316");
        assert_eq!(performance_color(12.0), "#ef4444");

        assert_eq!(performance_tier(95.0), "Excelente");
        assert_eq!(performance_tier(80.0), "Bueno");
        assert_eq!(performance_tier(75.5), "Regular");
        assert_eq!(performance_tier(69.9), "Necesita Mejora");
    }

    #[test]
    fn marker_size_is_clamped() {
        assert_eq!(marker_size(0.0), 6.0);
        assert_eq!(marker_size(50.0), 10.0);
        assert_eq!(marker_size(100.0), 14.0);
        assert_eq!(marker_size(250.0), 14.0);
        assert_eq!(marker_size(-10.0), 6.0);
    }
}
