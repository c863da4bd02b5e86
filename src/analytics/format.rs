// ============================================================================
// Formatage des nombres pour les textes générés
// ============================================================================

/// Formate un nombre avec séparateurs de milliers ("1,234,567.5")
///
/// Au plus 3 décimales, zéros de fin supprimés. Une valeur non finie
/// s'affiche "N/A".
pub fn format_thousands(value: f64) -> String {
    if !value.is_finite() {
        return "N/A".to_string();
    }

    let rounded = format!("{:.3}", value.abs());
    let (int_part, frac_part) = rounded.split_once('.').unwrap_or((rounded.as_str(), ""));
    let frac_part = frac_part.trim_end_matches('0');

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    // -0.0001 s'arrondit à "0" : pas de signe dans ce cas
    let is_zero = int_part.chars().all(|c| c == '0') && frac_part.is_empty();
    let sign = if value < 0.0 && !is_zero { "-" } else { "" };

    if frac_part.is_empty() {
        format!("{}{}", sign, grouped)
    } else {
        format!("{}{}.{}", sign, grouped, frac_part)
    }
}

/// Pourcentage entier d'un ratio [0, 1] ("80" pour 0.8)
///
/// Arrondi "demi vers le haut" comme un affichage de pourcentage classique
pub fn whole_percent(ratio: f64) -> String {
    format!("{}", (ratio * 100.0).round() as i64)
}

/// Valeur entière arrondie ("90" pour 89.6)
pub fn whole_number(value: f64) -> String {
    format!("{}", value.round() as i64)
}
