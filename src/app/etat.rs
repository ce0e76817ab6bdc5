//! src/app/etat.rs
//!
//! État UI (sans vue).
//!
//! Rôle : contenir l’état de l’application et offrir les actions des boutons
//! sans logique d’affichage.
//!
//! Contrats :
//! - `Session` est le contexte explicite d’un utilisateur connecté : créée à la
//!   connexion (ou en invité), modifiée seulement par ses méthodes, détruite à
//!   la déconnexion.
//! - Une seule évaluation par “Calculate”, via `noyau::evaluer_avec_demarche`.
//! - L’heure est passée en paramètre (tests déterministes).

use chrono::{DateTime, Utc};
use tracing::info;

use super::comptes::Comptes;
use super::historique::{EntreeCalcul, Historique};
use crate::noyau::{evaluer_avec_demarche, Demarche, Nombre};

pub const MSG_CHAMPS_VIDES: &str = "Please enter both username and password";
pub const MSG_CONNEXION_REFUSEE: &str = "Invalid username or password";
pub const MSG_EXPRESSION_VIDE: &str = "Please enter an expression";

/// Message affiché sous un formulaire ou sous la calculatrice.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Message {
    Succes(String),
    Erreur(String),
    Avertissement(String),
    Info(String),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ModeAuth {
    #[default]
    Connexion,
    Inscription,
    Invite,
}

impl ModeAuth {
    pub const TOUS: [ModeAuth; 3] = [ModeAuth::Connexion, ModeAuth::Inscription, ModeAuth::Invite];

    pub fn libelle(self) -> &'static str {
        match self {
            ModeAuth::Connexion => "Login",
            ModeAuth::Inscription => "Sign Up",
            ModeAuth::Invite => "Guest Mode",
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct FormulaireAuth {
    pub mode: ModeAuth,
    pub nom: String,
    pub mot_de_passe: String,
}

/// ISO-8601 UTC avec microsecondes.
pub fn horodatage_iso(t: DateTime<Utc>) -> String {
    t.format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
}

/// Identifiant d’invité : guest_AAAAMMJJ_HHMMSS (UTC).
pub fn id_invite(t: DateTime<Utc>) -> String {
    t.format("guest_%Y%m%d_%H%M%S").to_string()
}

/// Touche du pavé (voir vue.rs pour la disposition).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Touche {
    /// Texte inséré tel quel ("7", "**", "pi"…).
    Inserer(&'static str),
    /// Nom de fonction : insère "nom(".
    Fonction(&'static str),
    Effacer,
    RetourArriere,
    MemoireEffacer,
    MemoireRappeler,
}

/* ------------------------ Session ------------------------ */

#[derive(Clone, Debug)]
pub struct Session {
    pub utilisateur: String,

    // --- entrée utilisateur ---
    pub entree: String,

    // --- sorties ---
    pub dernier_resultat: Option<Nombre>,
    pub message: Option<Message>,
    pub demarche: Option<Demarche>,

    // --- mémoire (M+ / M- / MC / MR) ---
    pub memoire: Nombre,

    // --- affichage ---
    pub montrer_avance: bool,
}

impl Session {
    pub fn ouvrir(utilisateur: impl Into<String>) -> Self {
        let utilisateur = utilisateur.into();
        info!(utilisateur = %utilisateur, "session ouverte");
        Self {
            utilisateur,
            entree: String::new(),
            dernier_resultat: None,
            message: None,
            demarche: None,
            memoire: Nombre::from(0),
            montrer_avance: false,
        }
    }

    pub fn est_invite(&self) -> bool {
        self.utilisateur.starts_with("guest_")
    }

    /* ------------------------ Édition ------------------------ */

    pub fn ajouter(&mut self, texte: &str) {
        self.entree.push_str(texte);
    }

    /// C : vide l’entrée et oublie le dernier résultat (M+/M- sans effet ensuite).
    pub fn effacer(&mut self) {
        self.entree.clear();
        self.dernier_resultat = None;
    }

    /// ⌫ : retire le dernier caractère.
    pub fn retour_arriere(&mut self) {
        self.entree.pop();
    }

    pub fn appuyer(&mut self, touche: Touche) {
        match touche {
            Touche::Inserer(texte) => self.ajouter(texte),
            Touche::Fonction(nom) => {
                self.ajouter(nom);
                self.ajouter("(");
            }
            Touche::Effacer => self.effacer(),
            Touche::RetourArriere => self.retour_arriere(),
            Touche::MemoireEffacer => self.memoire_effacer(),
            Touche::MemoireRappeler => self.memoire_rappeler(),
        }
    }

    pub fn reutiliser(&mut self, expr: &str) {
        self.entree = expr.to_string();
    }

    /* ------------------------ Mémoire ------------------------ */

    /// MC
    pub fn memoire_effacer(&mut self) {
        self.memoire = Nombre::from(0);
    }

    /// MR : ajoute la mémoire à l’entrée, si non nulle.
    pub fn memoire_rappeler(&mut self) {
        if !self.memoire.est_zero() {
            self.entree.push_str(&self.memoire.to_string());
        }
    }

    /// M+
    pub fn memoire_ajouter(&mut self) {
        if let Some(r) = &self.dernier_resultat {
            match self.memoire.additionner(r) {
                Ok(m) => self.memoire = m,
                Err(e) => self.message = Some(Message::Erreur(e.to_string())),
            }
        }
    }

    /// M-
    pub fn memoire_soustraire(&mut self) {
        if let Some(r) = &self.dernier_resultat {
            match self.memoire.soustraire(r) {
                Ok(m) => self.memoire = m,
                Err(e) => self.message = Some(Message::Erreur(e.to_string())),
            }
        }
    }

    /* ------------------------ Calcul ------------------------ */

    /// Calculate : évalue l’entrée ; en cas de succès, enregistre l’historique
    /// et remplace l’entrée par le résultat.
    pub fn calculer(&mut self, historique: &mut Historique, horodatage: String) {
        if self.entree.trim().is_empty() {
            self.message = Some(Message::Avertissement(MSG_EXPRESSION_VIDE.to_string()));
            return;
        }

        let (res, demarche) = evaluer_avec_demarche(&self.entree);
        self.demarche = Some(demarche);

        match res {
            Err(e) => {
                self.message = Some(Message::Erreur(e.to_string()));
            }
            Ok(n) => {
                let texte = n.to_string();
                historique.ajouter(
                    &self.utilisateur,
                    EntreeCalcul {
                        expr: std::mem::take(&mut self.entree),
                        resultat: texte.clone(),
                        horodatage,
                    },
                );
                self.message = Some(Message::Succes(format!("Result: {texte}")));
                self.entree = texte;
                self.dernier_resultat = Some(n);
            }
        }
    }
}

/* ------------------------ Application ------------------------ */

#[derive(Debug)]
pub struct AppCalc {
    // --- contexte utilisateur (None = non connecté) ---
    pub session: Option<Session>,

    // --- authentification ---
    pub formulaire: FormulaireAuth,
    pub message_auth: Option<Message>,

    // --- magasins ---
    pub comptes: Comptes,
    pub historique: Historique,

    // --- UX ---
    // Permet à vue.rs de redonner le focus à l’entrée après un clic sur un bouton.
    pub focus_entree: bool,
}

impl Default for AppCalc {
    fn default() -> Self {
        Self {
            session: None,
            formulaire: FormulaireAuth::default(),
            message_auth: None,
            comptes: Comptes::default(),
            historique: Historique::default(),
            focus_entree: true, // au lancement, on veut pouvoir taper tout de suite
        }
    }
}

impl AppCalc {
    /// Submit du formulaire Login / Sign Up.
    pub fn soumettre_formulaire(&mut self, maintenant: DateTime<Utc>) {
        let mode = self.formulaire.mode;
        if mode == ModeAuth::Invite {
            self.entrer_invite(maintenant);
            return;
        }

        let FormulaireAuth {
            nom, mot_de_passe, ..
        } = &self.formulaire;

        if nom.is_empty() || mot_de_passe.is_empty() {
            self.message_auth = Some(Message::Erreur(MSG_CHAMPS_VIDES.to_string()));
            return;
        }

        match mode {
            ModeAuth::Inscription => {
                let res = self
                    .comptes
                    .creer(nom, mot_de_passe, horodatage_iso(maintenant));
                self.message_auth = Some(match res {
                    Ok(msg) => Message::Succes(msg.to_string()),
                    Err(e) => Message::Erreur(e.to_string()),
                });
            }
            ModeAuth::Connexion => {
                if self.comptes.authentifier(nom, mot_de_passe) {
                    self.session = Some(Session::ouvrir(nom.trim()));
                    self.formulaire.mot_de_passe.clear();
                    self.message_auth = None;
                    self.focus_entree = true;
                } else {
                    self.message_auth = Some(Message::Erreur(MSG_CONNEXION_REFUSEE.to_string()));
                }
            }
            ModeAuth::Invite => {}
        }
    }

    /// Continue as Guest.
    pub fn entrer_invite(&mut self, maintenant: DateTime<Utc>) {
        self.session = Some(Session::ouvrir(id_invite(maintenant)));
        self.message_auth = None;
        self.focus_entree = true;
    }

    /// Logout : la session est détruite (entrée, mémoire, dernier résultat).
    pub fn deconnecter(&mut self) {
        if let Some(s) = self.session.take() {
            info!(utilisateur = %s.utilisateur, "session fermée");
        }
        self.formulaire = FormulaireAuth::default();
    }

    pub fn calculer(&mut self, maintenant: DateTime<Utc>) {
        if let Some(s) = self.session.as_mut() {
            s.calculer(&mut self.historique, horodatage_iso(maintenant));
        }
        self.focus_entree = true;
    }

    pub fn effacer_historique(&mut self) {
        if let Some(s) = &self.session {
            self.historique.effacer(&s.utilisateur);
        }
    }

    /// Échap : effacer seulement l’entrée (comme bouton "C").
    pub fn clear_entree(&mut self) {
        if let Some(s) = self.session.as_mut() {
            s.effacer();
        }
        self.focus_entree = true;
    }

    /// Historique de l’utilisateur courant (vide hors session).
    pub fn historique_courant(&self) -> &[EntreeCalcul] {
        match &self.session {
            Some(s) => self.historique.charger(&s.utilisateur),
            None => &[],
        }
    }
}
