// src/noyau/format.rs

use std::fmt;

use super::nombre::Nombre;

/* ------------------------ Flottants ------------------------ */

/// Affichage court d’un flottant : plus petite écriture qui relit la même valeur.
/// - positionnel si 1e-4 <= |x| < 1e16 (6.283185307179586, 0.0001, 2.5)
/// - scientifique sinon, exposant signé sur 2 chiffres min. (1e+16, 1.5e-05)
pub fn format_reel(x: f64) -> String {
    if x.is_nan() {
        return "nan".to_string();
    }
    if x.is_infinite() {
        return if x > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    if x == 0.0 {
        return if x.is_sign_negative() { "-0.0" } else { "0.0" }.to_string();
    }

    // "{:e}" donne déjà les chiffres les plus courts : "-1.5e-7", "6.283185307179586e0"
    let sci = format!("{x:e}");
    let (mantisse, exposant) = match sci.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => (sci.as_str(), 0),
    };
    let negatif = mantisse.starts_with('-');
    let chiffres: String = mantisse.chars().filter(char::is_ascii_digit).collect();

    let corps = if (-4..16).contains(&exposant) {
        positionnel(&chiffres, exposant)
    } else {
        let (tete, queue) = chiffres.split_at(1);
        let signe = if exposant < 0 { '-' } else { '+' };
        if queue.is_empty() {
            format!("{tete}e{signe}{:02}", exposant.abs())
        } else {
            format!("{tete}.{queue}e{signe}{:02}", exposant.abs())
        }
    };

    if negatif {
        format!("-{corps}")
    } else {
        corps
    }
}

/// chiffres significatifs "d1d2d3…" avec la virgule après la position `exposant`.
fn positionnel(chiffres: &str, exposant: i32) -> String {
    if exposant < 0 {
        let zeros = "0".repeat((-exposant - 1) as usize);
        return format!("0.{zeros}{chiffres}");
    }

    let n_entier = exposant as usize + 1;
    if chiffres.len() <= n_entier {
        let zeros = "0".repeat(n_entier - chiffres.len());
        format!("{chiffres}{zeros}.0")
    } else {
        let (ent, frac) = chiffres.split_at(n_entier);
        format!("{ent}.{frac}")
    }
}

/* ------------------------ Nombre ------------------------ */

impl fmt::Display for Nombre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Nombre::Entier(n) => write!(f, "{n}"),
            Nombre::Reel(x) => f.write_str(&format_reel(*x)),
        }
    }
}
