//! Noyau — évaluateur d’expressions à liste blanche
//!
//! Organisation interne :
//! - normalise.rs : réécritures syntaxiques (50% , 2pi , 3(4) …)
//! - jetons.rs    : tokenisation
//! - rpn.rs       : shunting-yard + construction Expr
//! - expr.rs      : AST + évaluation
//! - espace.rs    : espace de noms (liste blanche)
//! - fonctions.rs : primitives de la liste blanche
//! - nombre.rs    : entier exact / flottant
//! - format.rs    : affichage des nombres
//! - erreur.rs    : classification des échecs
//! - eval.rs      : pipeline complet

pub mod erreur;
pub mod espace;
pub mod eval;
pub mod expr;
pub mod fonctions;
pub mod format;
pub mod jetons;
pub mod nombre;
pub mod normalise;
pub mod rpn;

#[cfg(test)]
mod tests_proprietes;

#[cfg(test)]
mod tests_fuzz_safe;

// API publique minimale
pub use erreur::ErreurEval;
pub use espace::Espace;
pub use eval::{evaluer, evaluer_avec_demarche, Demarche};
pub use nombre::Nombre;
