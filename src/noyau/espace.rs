// src/noyau/espace.rs
//
// Espace de noms = LISTE BLANCHE.
//
// C’est la frontière de sécurité de l’évaluateur : une expression ne peut
// atteindre que les constantes et fonctions listées ici. Aucun accès aux
// attributs, aux modules, aux fichiers ou au processus n’existe dans la
// grammaire ; un nom absent de la table est une erreur NomInconnu.
//
// Construit une seule fois (OnceLock), jamais modifié ensuite : partageable
// entre appels concurrents sans verrou.

use std::collections::BTreeMap;
use std::f64::consts;
use std::sync::OnceLock;

use super::erreur::ErreurEval;
use super::expr::Valeur;
use super::fonctions as f;
use super::nombre::Nombre;

/// Implémentation d’une fonction de la liste blanche.
pub type Primitive = fn(&[Valeur]) -> Result<Valeur, ErreurEval>;

#[derive(Clone, Copy)]
pub enum Symbole {
    Constante(f64),
    Fonction(Primitive),
}

pub struct Espace {
    symboles: BTreeMap<&'static str, Symbole>,
}

/// Table complète : constantes + fonctions mathématiques + abs/round/min/max.
/// `pow` est la puissance flottante (pas la variante entière à 3 arguments).
const TABLE: &[(&str, Symbole)] = &[
    // constantes
    ("pi", Symbole::Constante(consts::PI)),
    ("e", Symbole::Constante(consts::E)),
    ("tau", Symbole::Constante(consts::TAU)),
    ("inf", Symbole::Constante(f64::INFINITY)),
    ("nan", Symbole::Constante(f64::NAN)),
    // trigonométrie
    ("sin", Symbole::Fonction(f::sin)),
    ("cos", Symbole::Fonction(f::cos)),
    ("tan", Symbole::Fonction(f::tan)),
    ("asin", Symbole::Fonction(f::asin)),
    ("acos", Symbole::Fonction(f::acos)),
    ("atan", Symbole::Fonction(f::atan)),
    ("atan2", Symbole::Fonction(f::atan2)),
    ("sinh", Symbole::Fonction(f::sinh)),
    ("cosh", Symbole::Fonction(f::cosh)),
    ("tanh", Symbole::Fonction(f::tanh)),
    ("asinh", Symbole::Fonction(f::asinh)),
    ("acosh", Symbole::Fonction(f::acosh)),
    ("atanh", Symbole::Fonction(f::atanh)),
    ("degrees", Symbole::Fonction(f::degrees)),
    ("radians", Symbole::Fonction(f::radians)),
    ("hypot", Symbole::Fonction(f::hypot)),
    ("dist", Symbole::Fonction(f::dist)),
    // puissances / logarithmes
    ("sqrt", Symbole::Fonction(f::sqrt)),
    ("cbrt", Symbole::Fonction(f::cbrt)),
    ("exp", Symbole::Fonction(f::exp)),
    ("exp2", Symbole::Fonction(f::exp2)),
    ("expm1", Symbole::Fonction(f::expm1)),
    ("log", Symbole::Fonction(f::log)),
    ("log10", Symbole::Fonction(f::log10)),
    ("log2", Symbole::Fonction(f::log2)),
    ("log1p", Symbole::Fonction(f::log1p)),
    ("pow", Symbole::Fonction(f::pow)),
    // arrondis / représentation
    ("ceil", Symbole::Fonction(f::ceil)),
    ("floor", Symbole::Fonction(f::floor)),
    ("trunc", Symbole::Fonction(f::trunc)),
    ("fabs", Symbole::Fonction(f::fabs)),
    ("copysign", Symbole::Fonction(f::copysign)),
    ("fmod", Symbole::Fonction(f::fmod)),
    ("remainder", Symbole::Fonction(f::remainder)),
    ("modf", Symbole::Fonction(f::modf)),
    ("frexp", Symbole::Fonction(f::frexp)),
    ("ldexp", Symbole::Fonction(f::ldexp)),
    ("nextafter", Symbole::Fonction(f::nextafter)),
    ("ulp", Symbole::Fonction(f::ulp)),
    // tests
    ("isfinite", Symbole::Fonction(f::isfinite)),
    ("isinf", Symbole::Fonction(f::isinf)),
    ("isnan", Symbole::Fonction(f::isnan)),
    ("isclose", Symbole::Fonction(f::isclose)),
    // arithmétique entière
    ("factorial", Symbole::Fonction(f::factorial)),
    ("comb", Symbole::Fonction(f::comb)),
    ("perm", Symbole::Fonction(f::perm)),
    ("gcd", Symbole::Fonction(f::gcd)),
    ("lcm", Symbole::Fonction(f::lcm)),
    ("isqrt", Symbole::Fonction(f::isqrt)),
    // sommes / produits sur tuple
    ("fsum", Symbole::Fonction(f::fsum)),
    ("prod", Symbole::Fonction(f::prod)),
    ("sumprod", Symbole::Fonction(f::sumprod)),
    // builtins
    ("abs", Symbole::Fonction(f::abs)),
    ("round", Symbole::Fonction(f::round)),
    ("min", Symbole::Fonction(f::min)),
    ("max", Symbole::Fonction(f::max)),
];

impl Espace {
    /// L’espace standard, partagé par tout le processus.
    pub fn standard() -> &'static Espace {
        static ESPACE: OnceLock<Espace> = OnceLock::new();
        ESPACE.get_or_init(|| Espace {
            symboles: TABLE.iter().copied().collect(),
        })
    }

    /// Valeur d’un identifiant (constante ou référence de fonction).
    pub fn resoudre(&self, nom: &str) -> Result<Valeur, ErreurEval> {
        match self.symboles.get_key_value(nom) {
            Some((_, Symbole::Constante(x))) => Ok(Valeur::Nombre(Nombre::Reel(*x))),
            Some((cle, Symbole::Fonction(_))) => Ok(Valeur::Fonction(*cle)),
            None => Err(ErreurEval::NomInconnu(nom.to_string())),
        }
    }

    /// Appelle une fonction de la table.
    pub fn appeler(&self, nom: &str, args: &[Valeur]) -> Result<Valeur, ErreurEval> {
        match self.symboles.get(nom) {
            Some(Symbole::Fonction(prim)) => prim(args),
            Some(Symbole::Constante(_)) => Err(ErreurEval::echec("'float' object is not callable")),
            None => Err(ErreurEval::NomInconnu(nom.to_string())),
        }
    }

    /// Noms disponibles, triés (aide de l’interface).
    pub fn noms(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.symboles.keys().copied()
    }

    pub fn est_fonction(&self, nom: &str) -> bool {
        matches!(self.symboles.get(nom), Some(Symbole::Fonction(_)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn liste_blanche_seulement() {
        let esp = Espace::standard();
        for nom in [
            "__import__",
            "__builtins__",
            "open",
            "eval",
            "exec",
            "globals",
            "os",
            "math",
            "PI",
        ] {
            assert_eq!(
                esp.resoudre(nom),
                Err(ErreurEval::NomInconnu(nom.to_string())),
                "nom={nom}"
            );
        }
    }

    #[test]
    fn constantes_et_fonctions() {
        let esp = Espace::standard();
        assert_eq!(
            esp.resoudre("pi"),
            Ok(Valeur::Nombre(Nombre::Reel(consts::PI)))
        );
        assert_eq!(esp.resoudre("sqrt"), Ok(Valeur::Fonction("sqrt")));
        assert!(esp.est_fonction("factorial"));
        assert!(!esp.est_fonction("e"));
        assert_eq!(
            esp.appeler("e", &[]),
            Err(ErreurEval::echec("'float' object is not callable"))
        );
    }

    #[test]
    fn noms_tries_et_uniques() {
        let noms: Vec<&str> = Espace::standard().noms().collect();
        assert_eq!(noms.len(), TABLE.len());
        assert!(noms.windows(2).all(|w| w[0] < w[1]));
        assert!(noms.contains(&"abs") && noms.contains(&"round"));
    }
}
