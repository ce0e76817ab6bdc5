// src/noyau/normalise.rs
//
// Réécriture des raccourcis de saisie avant tokenisation.
//
// Ordre fixe (chaque règle peut produire un motif consommé par une règle suivante) :
//   1) trim
//   2) pourcentage      : 50%   -> (50/100)
//   3) chiffre + lettre : 2pi   -> 2*pi
//   4) chiffre + '('    : 3(4)  -> 3*(4)
//   5) ')' + chiffre    : )4    -> )*4      puis ')(' -> ')*('
//
// Chaque règle = UNE passe gauche->droite sans chevauchement (replace_all),
// jamais relancée sur son propre résultat. Pas de multiplication implicite
// lettre/lettre : "pi e" reste tel quel.

use std::sync::OnceLock;

use regex::Regex;

struct Regle {
    motif: Regex,
    remplacement: &'static str,
}

fn regles() -> &'static [Regle] {
    static REGLES: OnceLock<Vec<Regle>> = OnceLock::new();
    REGLES.get_or_init(|| {
        [
            (r"(\d+(?:\.\d+)?)\s*%", "(${1}/100)"),
            (r"(\d)([a-z])", "${1}*${2}"),
            (r"(\d)\(", "${1}*("),
            (r"\)(\d)", ")*${1}"),
            (r"\)\(", ")*("),
        ]
        .into_iter()
        .map(|(motif, remplacement)| Regle {
            motif: Regex::new(motif).expect("motif de normalisation littéral"),
            remplacement,
        })
        .collect()
    })
}

/// Normalise une saisie brute (voir en-tête pour les règles).
pub fn normaliser(entree: &str) -> String {
    regles()
        .iter()
        .fold(entree.trim().to_string(), |texte, regle| {
            regle
                .motif
                .replace_all(&texte, regle.remplacement)
                .into_owned()
        })
}
