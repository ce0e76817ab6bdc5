//! Noyau — évaluation (pipeline complet)
//!
//! normaliser -> tokenize -> RPN -> Expr -> évaluation (liste blanche)
//!            -> contrôle “nombre” -> normalisation entière
//!
//! Pur : aucune entrée/sortie, aucun état conservé entre deux appels.

use tracing::debug;

use super::erreur::ErreurEval;
use super::espace::Espace;
use super::expr::{format_expr, Valeur};
use super::jetons::{format_tokens, tokenize};
use super::nombre::Nombre;
use super::normalise::normaliser;
use super::rpn::{format_rpn, from_rpn, to_rpn};

/// Longueur maximale acceptée (en caractères, avant normalisation).
pub const LONGUEUR_MAX: usize = 2000;

/// Étapes intermédiaires, pour l’affichage “démarche”.
/// Les champs restent vides au-delà de l’étape qui a échoué.
#[derive(Default, Clone, Debug)]
pub struct Demarche {
    pub normalisee: String,
    pub jetons: String,
    pub rpn: String,
    pub arbre: String,
    pub note: String,
}

/// API publique : évalue une expression brute.
pub fn evaluer(entree: &str) -> Result<Nombre, ErreurEval> {
    evaluer_avec_demarche(entree).0
}

/// Comme `evaluer`, avec les étapes intermédiaires.
pub fn evaluer_avec_demarche(entree: &str) -> (Result<Nombre, ErreurEval>, Demarche) {
    let mut d = Demarche::default();
    let res = pipeline(entree, &mut d);

    match &res {
        Ok(n) => debug!(entree, resultat = %n, "évaluation réussie"),
        Err(e) => {
            if let ErreurEval::SyntaxeInvalide { detail } = e {
                d.note = detail.clone();
            }
            debug!(entree, genre = e.genre(), erreur = %e, "évaluation refusée");
        }
    }
    (res, d)
}

fn pipeline(entree: &str, d: &mut Demarche) -> Result<Nombre, ErreurEval> {
    if entree.chars().count() > LONGUEUR_MAX {
        return Err(ErreurEval::echec("expression too long"));
    }

    // 1) Normalisation syntaxique
    let texte = normaliser(entree);
    d.normalisee = texte.clone();

    // 2) Jetons
    let jetons = tokenize(&texte)?;
    d.jetons = format_tokens(&jetons);

    // 3) RPN
    let rpn = to_rpn(&jetons)?;
    d.rpn = format_rpn(&rpn);

    // 4) AST (profondeur bornée)
    let expr = from_rpn(&rpn)?;
    d.arbre = format_expr(&expr);

    // 5) Évaluation contre la liste blanche
    match expr.evaluer(Espace::standard())? {
        // 6) 4.0 -> 4
        Valeur::Nombre(n) => Ok(n.normaliser()),
        // fonction nue, tuple…
        _ => Err(ErreurEval::PasUnNombre),
    }
}
