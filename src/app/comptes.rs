//! src/app/comptes.rs
//!
//! Magasin de comptes (en mémoire).
//!
//! Contrats :
//! - le nom est rogné (trim) avant validation, création et connexion
//! - nom : 3 à 20 caractères parmi [A-Za-z0-9_]
//! - mot de passe : au moins 6 caractères
//! - seule l’empreinte SHA-256 (hex) est conservée, jamais le mot de passe

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::{info, warn};

pub const NOM_MIN: usize = 3;
pub const NOM_MAX: usize = 20;
pub const MOT_DE_PASSE_MIN: usize = 6;
/// Longueur maximale acceptée par le champ de saisie.
pub const MOT_DE_PASSE_MAX_SAISIE: usize = 50;

/// Message affiché après une création réussie.
pub const COMPTE_CREE: &str = "Account created successfully! You can now log in.";

#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum ErreurCompte {
    #[error("Username must be at least 3 characters")]
    NomTropCourt,

    #[error("Username must be at most 20 characters")]
    NomTropLong,

    #[error("Username can only contain letters, numbers, and underscores")]
    NomInvalide,

    #[error("Password must be at least 6 characters")]
    MotDePasseTropCourt,

    #[error("Username already exists")]
    NomPris,
}

#[derive(Clone, Debug)]
pub struct Compte {
    pub empreinte: String,
    pub cree_le: String,
}

#[derive(Default, Debug)]
pub struct Comptes {
    comptes: HashMap<String, Compte>,
}

/// Empreinte hexadécimale (minuscules) d’un mot de passe.
pub fn empreinte_mot_de_passe(mot_de_passe: &str) -> String {
    hex::encode(Sha256::digest(mot_de_passe.as_bytes()))
}

fn motif_nom() -> &'static Regex {
    static MOTIF: OnceLock<Regex> = OnceLock::new();
    MOTIF.get_or_init(|| Regex::new(r"^[a-zA-Z0-9_]+$").expect("motif de nom littéral"))
}

pub fn valider_nom(nom: &str) -> Result<(), ErreurCompte> {
    let n = nom.chars().count();
    if n < NOM_MIN {
        return Err(ErreurCompte::NomTropCourt);
    }
    if n > NOM_MAX {
        return Err(ErreurCompte::NomTropLong);
    }
    if !motif_nom().is_match(nom) {
        return Err(ErreurCompte::NomInvalide);
    }
    Ok(())
}

pub fn valider_mot_de_passe(mot_de_passe: &str) -> Result<(), ErreurCompte> {
    if mot_de_passe.chars().count() < MOT_DE_PASSE_MIN {
        return Err(ErreurCompte::MotDePasseTropCourt);
    }
    Ok(())
}

impl Comptes {
    /// Crée un compte. Renvoie le message de succès.
    pub fn creer(
        &mut self,
        nom: &str,
        mot_de_passe: &str,
        cree_le: String,
    ) -> Result<&'static str, ErreurCompte> {
        let nom = nom.trim();
        valider_nom(nom)?;
        valider_mot_de_passe(mot_de_passe)?;

        if self.comptes.contains_key(nom) {
            return Err(ErreurCompte::NomPris);
        }

        self.comptes.insert(
            nom.to_string(),
            Compte {
                empreinte: empreinte_mot_de_passe(mot_de_passe),
                cree_le,
            },
        );
        info!(utilisateur = nom, "compte créé");
        Ok(COMPTE_CREE)
    }

    /// Vrai si le compte existe et que l’empreinte correspond.
    pub fn authentifier(&self, nom: &str, mot_de_passe: &str) -> bool {
        let nom = nom.trim();
        let ok = self
            .comptes
            .get(nom)
            .is_some_and(|c| c.empreinte == empreinte_mot_de_passe(mot_de_passe));
        if !ok {
            warn!(utilisateur = nom, "connexion refusée");
        }
        ok
    }

    pub fn compte(&self, nom: &str) -> Option<&Compte> {
        self.comptes.get(nom.trim())
    }
}
