// src/app/vue.rs
//
// Vue (UI egui) — natif + web
// ---------------------------
// Objectifs :
// - Panneau latéral : compte (Login / Sign Up / Guest Mode) puis mémoire
// - Centre : calculatrice (affichage, pavé, fonctions avancées, Calculate)
//   + historique + aide
// - Clavier : Enter calcule (quand le champ a le focus)
// - Tactile : gros boutons, focus redonné après clic (focus_entree)
//
// Note :
// - PAS de Key::NumEnter (n’existe pas dans egui 0.33.x)
// - Les actions modifient l’état via etat.rs ; aucune évaluation ici.

use chrono::Utc;
use eframe::egui;

use super::comptes::{MOT_DE_PASSE_MAX_SAISIE, NOM_MAX};
use super::etat::{AppCalc, Message, ModeAuth, Session, Touche};
use super::historique::HISTORIQUE_AFFICHE;
use crate::noyau::{Demarche, Espace};

/// Pavé principal (lignes de longueurs inégales, comme une calculatrice de bureau).
const PAVE: [&[&str]; 5] = [
    &["MC", "MR", "C", "⌫"],
    &["7", "8", "9", "/", "sqrt"],
    &["4", "5", "6", "*", "^"],
    &["1", "2", "3", "-", "("],
    &["0", ".", "%", "+", ")"],
];

/// Fonctions avancées (case à cocher).
const AVANCE: [&[&str]; 3] = [
    &["sin", "cos", "tan", "pi", "e"],
    &["asin", "acos", "atan", "log", "ln"],
    &["floor", "ceil", "abs", "factorial", "degrees"],
];

/// Action d’une touche d’après son libellé.
fn touche(libelle: &'static str) -> Touche {
    match libelle {
        "MC" => Touche::MemoireEffacer,
        "MR" => Touche::MemoireRappeler,
        "C" => Touche::Effacer,
        "⌫" => Touche::RetourArriere,
        // ^ n’est pas l’opérateur de puissance du langage : on insère **
        "^" => Touche::Inserer("**"),
        "ln" => Touche::Fonction("log"),
        "sqrt" | "sin" | "cos" | "tan" | "asin" | "acos" | "atan" | "log" | "floor" | "ceil"
        | "abs" | "factorial" | "degrees" => Touche::Fonction(libelle),
        autre => Touche::Inserer(autre),
    }
}

const AIDE_SYNTAXE: &str = "\
Basic: +  -  *  /   floor division: //   modulo: (a) % b
Power: ** or ^ (e.g. 2**3 or 2^3)
Percentage: 50% * 200 → 100 (a number followed by % is always a percentage)
Booleans: True / False are not supported; isclose, isinf… answer 1 or 0
Implicit multiplication: 2pi, 3(4), (1+2)(3+4)
Functions: sqrt(144) → 12, sin(pi/2) → 1, log(100, 10) → 2
Memory: M+ adds the last result, M- subtracts it, MC clears, MR recalls
Tip: use parentheses for complex expressions like (2+3)*(4+5)";

impl AppCalc {
    /* ------------------------ Panneau latéral ------------------------ */

    /// Compte + mémoire : à appeler depuis eframe::App::update(...)
    pub fn ui_lateral(&mut self, ctx: &egui::Context) {
        egui::SidePanel::left("panneau_compte")
            .resizable(false)
            .default_width(220.0)
            .show(ctx, |ui| {
                ui.heading("Account");
                ui.add_space(6.0);

                if self.session.is_some() {
                    self.ui_connecte(ui);
                } else {
                    self.ui_authentification(ui);
                }
            });
    }

    fn ui_authentification(&mut self, ui: &mut egui::Ui) {
        ui.horizontal_wrapped(|ui| {
            for mode in ModeAuth::TOUS {
                ui.radio_value(&mut self.formulaire.mode, mode, mode.libelle());
            }
        });
        ui.add_space(6.0);

        if self.formulaire.mode == ModeAuth::Invite {
            if ui
                .add_sized([ui.available_width(), 30.0], egui::Button::new("Continue as Guest"))
                .clicked()
            {
                self.entrer_invite(Utc::now());
            }
        } else {
            ui.label("Username");
            ui.add(
                egui::TextEdit::singleline(&mut self.formulaire.nom)
                    .char_limit(NOM_MAX)
                    .id_salt("auth_nom"),
            );
            ui.label("Password");
            let resp = ui.add(
                egui::TextEdit::singleline(&mut self.formulaire.mot_de_passe)
                    .char_limit(MOT_DE_PASSE_MAX_SAISIE)
                    .password(true)
                    .id_salt("auth_mdp"),
            );

            let enter = resp.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
            if ui.button("Submit").clicked() || enter {
                self.soumettre_formulaire(Utc::now());
            }
        }

        if let Some(m) = &self.message_auth {
            ui.add_space(6.0);
            afficher_message(ui, m);
        }
    }

    fn ui_connecte(&mut self, ui: &mut egui::Ui) {
        let mut deconnexion = false;

        if let Some(s) = self.session.as_mut() {
            afficher_message(ui, &Message::Succes(format!("Logged in as: {}", s.utilisateur)));
            if let Some(compte) = self.comptes.compte(&s.utilisateur) {
                ui.small(format!("Member since {}", &compte.cree_le[..10.min(compte.cree_le.len())]));
            }
            deconnexion = ui.button("Logout").clicked();

            ui.add_space(8.0);
            ui.separator();
            ui.heading("Memory");
            afficher_message(ui, &Message::Info(format!("Stored: {}", s.memoire)));

            ui.horizontal(|ui| {
                if ui.button("M+").clicked() {
                    s.memoire_ajouter();
                }
                if ui.button("M-").clicked() {
                    s.memoire_soustraire();
                }
                if ui.button("MC").clicked() {
                    s.memoire_effacer();
                }
            });
        }

        if deconnexion {
            self.deconnecter();
        }
    }

    /* ------------------------ Panneau central ------------------------ */

    /// UI principale : à appeler depuis eframe::App::update(...)
    pub fn ui(&mut self, ui: &mut egui::Ui) {
        // Densité “calc”
        ui.spacing_mut().item_spacing = egui::vec2(6.0, 6.0);

        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.heading("Advanced Calculator");
                ui.label("A feature-rich calculator with user accounts and calculation history");
                ui.add_space(6.0);

                if self.session.is_none() {
                    afficher_message(
                        ui,
                        &Message::Info(
                            "Please log in, sign up, or continue as guest from the sidebar to use the calculator."
                                .into(),
                        ),
                    );
                    ui.add_space(8.0);
                    ui.monospace("Examples: sqrt(144)   sin(pi/2)   2^8   50% * 200");
                    return;
                }

                ui.columns(2, |cols| {
                    self.ui_calculatrice(&mut cols[0]);
                    self.ui_historique(&mut cols[1]);
                });

                ui.add_space(8.0);
                ui.separator();
                ui_aide(ui);
            });
    }

    fn ui_calculatrice(&mut self, ui: &mut egui::Ui) {
        let mut calculer = false;
        let focus = std::mem::take(&mut self.focus_entree);
        let mut refocus = false;

        let Some(s) = self.session.as_mut() else {
            return;
        };

        ui.heading("Calculator");

        // IMPORTANT : id stable + focus contrôlé
        let resp = ui.add(
            egui::TextEdit::singleline(&mut s.entree)
                .desired_width(ui.available_width())
                .hint_text("0")
                .id_salt("entree_edit")
                .font(egui::TextStyle::Heading),
        );
        if focus {
            resp.request_focus();
        }

        // --- Clavier : Enter calcule (seulement si le champ a le focus) ---
        if resp.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
            calculer = true;
        }

        ui.add_space(6.0);
        refocus |= grille(ui, "pave_principal", &PAVE, s);

        ui.add_space(4.0);
        ui.checkbox(&mut s.montrer_avance, "Show Advanced Functions");
        if s.montrer_avance {
            refocus |= grille(ui, "pave_avance", &AVANCE, s);
        }

        ui.add_space(6.0);
        if ui
            .add_sized([ui.available_width(), 34.0], egui::Button::new("Calculate"))
            .clicked()
        {
            calculer = true;
        }

        if let Some(m) = &s.message {
            afficher_message(ui, m);
        }

        if let Some(d) = &s.demarche {
            ui_demarche(ui, d);
        }

        if calculer {
            self.calculer(Utc::now());
        }
        if refocus {
            self.focus_entree = true;
        }
    }

    fn ui_historique(&mut self, ui: &mut egui::Ui) {
        ui.heading("History");

        let historique = self.historique_courant();
        if historique.is_empty() {
            afficher_message(
                ui,
                &Message::Info("No calculations yet. Start calculating to build your history!".into()),
            );
            return;
        }

        ui.small(format!(
            "Showing {} of {} calculations",
            HISTORIQUE_AFFICHE.min(historique.len()),
            historique.len()
        ));

        let mut a_reutiliser: Option<String> = None;
        egui::ScrollArea::vertical()
            .id_salt("historique_defilement")
            .max_height(420.0)
            .show(ui, |ui| {
                for (idx, e) in historique.iter().take(HISTORIQUE_AFFICHE).enumerate() {
                    ui.push_id(idx, |ui| {
                        ui.strong(&e.expr);
                        ui.monospace(format!("= {}", e.resultat));
                        ui.small(e.horodatage_court());
                        if ui.button("↻ Reuse").clicked() {
                            a_reutiliser = Some(e.expr.clone());
                        }
                        ui.separator();
                    });
                }
            });

        let effacer = ui.button("Clear History").clicked();

        if let (Some(expr), Some(s)) = (a_reutiliser, self.session.as_mut()) {
            s.reutiliser(&expr);
            self.focus_entree = true;
        }
        if effacer {
            self.effacer_historique();
        }
    }
}

/* ------------------------ Widgets ------------------------ */

/// Grille de boutons ; renvoie vrai si une touche a été pressée.
fn grille(ui: &mut egui::Ui, id: &str, lignes: &[&[&'static str]], s: &mut Session) -> bool {
    let mut presse = false;
    egui::Grid::new(id)
        .num_columns(5)
        .spacing([6.0, 6.0])
        .show(ui, |ui| {
            for ligne in lignes {
                for &libelle in ligne.iter() {
                    if ui.add_sized([64.0, 32.0], egui::Button::new(libelle)).clicked() {
                        s.appuyer(touche(libelle));
                        presse = true;
                    }
                }
                ui.end_row();
            }
        });
    presse
}

fn afficher_message(ui: &mut egui::Ui, m: &Message) {
    let (couleur, texte) = match m {
        Message::Succes(t) => (egui::Color32::from_rgb(0x2e, 0x7d, 0x32), t),
        Message::Erreur(t) => (ui.visuals().error_fg_color, t),
        Message::Avertissement(t) => (ui.visuals().warn_fg_color, t),
        Message::Info(t) => (ui.visuals().hyperlink_color, t),
    };
    egui::Frame::group(ui.style()).show(ui, |ui| {
        ui.set_min_width(ui.available_width());
        ui.colored_label(couleur, texte);
    });
}

fn ui_demarche(ui: &mut egui::Ui, d: &Demarche) {
    egui::CollapsingHeader::new("Steps")
        .default_open(false)
        .show(ui, |ui| {
            champ_demarche(ui, "Normalized", "demarche_normalisee", &d.normalisee);
            champ_demarche(ui, "Tokens", "demarche_jetons", &d.jetons);
            champ_demarche(ui, "RPN", "demarche_rpn", &d.rpn);
            champ_demarche(ui, "Tree", "demarche_arbre", &d.arbre);
            if !d.note.is_empty() {
                champ_demarche(ui, "Note", "demarche_note", &d.note);
            }
        });
}

fn champ_demarche(ui: &mut egui::Ui, titre: &str, id: &str, contenu: &str) {
    ui.add_space(4.0);
    ui.label(format!("{titre} :"));
    // Affichage lecture seule “stable”, sans TextEdit interactif.
    egui::Frame::group(ui.style())
        .fill(ui.visuals().extreme_bg_color)
        .show(ui, |ui| {
            ui.push_id(id, |ui| {
                ui.set_min_width(ui.available_width());
                ui.monospace(contenu);
            });
        });
}

fn ui_aide(ui: &mut egui::Ui) {
    egui::CollapsingHeader::new("Help & Tips")
        .default_open(false)
        .show(ui, |ui| {
            ui.monospace(AIDE_SYNTAXE);
            ui.add_space(6.0);

            let espace = Espace::standard();
            let (fonctions, constantes): (Vec<&str>, Vec<&str>) =
                espace.noms().partition(|n| espace.est_fonction(n));
            ui.label(format!("Constants: {}", constantes.join(", ")));
            ui.label(format!("Functions: {}", fonctions.join(", ")));
        });
}
