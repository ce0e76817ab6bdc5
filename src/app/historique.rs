//! src/app/historique.rs
//!
//! Historique des calculs, par utilisateur (en mémoire).
//! Le plus récent en tête ; au-delà de HISTORIQUE_MAX, les plus anciens tombent.

use std::collections::HashMap;

/// Entrées conservées par utilisateur.
pub const HISTORIQUE_MAX: usize = 100;

/// Entrées affichées dans le panneau.
pub const HISTORIQUE_AFFICHE: usize = 30;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntreeCalcul {
    pub expr: String,
    pub resultat: String,
    /// ISO-8601 UTC, ex. "2026-03-14T09:26:53.589793"
    pub horodatage: String,
}

impl EntreeCalcul {
    /// "2026-03-14 09:26:53" : 19 premiers caractères, 'T' remplacé par une espace.
    pub fn horodatage_court(&self) -> String {
        self.horodatage
            .chars()
            .take(19)
            .collect::<String>()
            .replace('T', " ")
    }
}

#[derive(Default, Debug)]
pub struct Historique {
    par_utilisateur: HashMap<String, Vec<EntreeCalcul>>,
}

impl Historique {
    pub fn ajouter(&mut self, utilisateur: &str, entree: EntreeCalcul) {
        let liste = self
            .par_utilisateur
            .entry(utilisateur.to_string())
            .or_default();
        liste.insert(0, entree);
        liste.truncate(HISTORIQUE_MAX);
    }

    /// Entrées de l’utilisateur, la plus récente d’abord.
    pub fn charger(&self, utilisateur: &str) -> &[EntreeCalcul] {
        self.par_utilisateur
            .get(utilisateur)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn effacer(&mut self, utilisateur: &str) {
        self.par_utilisateur.remove(utilisateur);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entree(i: usize) -> EntreeCalcul {
        EntreeCalcul {
            expr: format!("{i}+0"),
            resultat: i.to_string(),
            horodatage: format!("2026-01-01T00:00:{:02}.000000", i % 60),
        }
    }

    #[test]
    fn plus_recent_en_tete_et_plafond() {
        let mut h = Historique::default();
        for i in 0..HISTORIQUE_MAX + 5 {
            h.ajouter("alice", entree(i));
        }
        let liste = h.charger("alice");
        assert_eq!(liste.len(), HISTORIQUE_MAX);
        assert_eq!(liste[0].resultat, (HISTORIQUE_MAX + 4).to_string());
        assert_eq!(liste[HISTORIQUE_MAX - 1].resultat, "5");
    }

    #[test]
    fn isole_par_utilisateur_et_effacement() {
        let mut h = Historique::default();
        h.ajouter("alice", entree(1));
        h.ajouter("bob", entree(2));
        h.effacer("alice");
        assert!(h.charger("alice").is_empty());
        assert_eq!(h.charger("bob"), &[entree(2)]);
        assert!(h.charger("inconnu").is_empty());
    }

    #[test]
    fn horodatage_affiche() {
        let e = EntreeCalcul {
            expr: "1+1".into(),
            resultat: "2".into(),
            horodatage: "2026-03-14T09:26:53.589793".into(),
        };
        assert_eq!(e.horodatage_court(), "2026-03-14 09:26:53");
    }
}
