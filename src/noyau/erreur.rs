// src/noyau/erreur.rs
//
// Classification des échecs d’évaluation.
// Le texte (Display) est celui affiché tel quel à l’utilisateur.

use thiserror::Error;

#[derive(Error, Clone, Debug, PartialEq)]
pub enum ErreurEval {
    #[error("Division by zero")]
    DivisionParZero,

    /// `detail` sert au journal et à la démarche, jamais à l’affichage.
    #[error("Invalid syntax")]
    SyntaxeInvalide { detail: String },

    #[error("Unknown function or variable: {0}")]
    NomInconnu(String),

    #[error("Result is not a number")]
    PasUnNombre,

    #[error("Error: {0}")]
    Echec(String),
}

impl ErreurEval {
    pub fn syntaxe(detail: impl Into<String>) -> Self {
        Self::SyntaxeInvalide {
            detail: detail.into(),
        }
    }

    pub fn echec(detail: impl Into<String>) -> Self {
        Self::Echec(detail.into())
    }

    /// Erreur de domaine des fonctions mathématiques (sqrt(-1), asin(2)…).
    pub fn domaine() -> Self {
        Self::echec("math domain error")
    }

    /// Débordement d’une fonction mathématique (exp(1000)…).
    pub fn plage() -> Self {
        Self::echec("math range error")
    }

    /// Nom court, pour les journaux.
    pub fn genre(&self) -> &'static str {
        match self {
            Self::DivisionParZero => "division_par_zero",
            Self::SyntaxeInvalide { .. } => "syntaxe_invalide",
            Self::NomInconnu(_) => "nom_inconnu",
            Self::PasUnNombre => "pas_un_nombre",
            Self::Echec(_) => "echec",
        }
    }
}
