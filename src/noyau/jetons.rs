// src/noyau/jetons.rs

use num_bigint::BigInt;

use super::erreur::ErreurEval;
use super::nombre::Nombre;

#[derive(Clone, Debug, PartialEq)]
pub enum Tok {
    Num(Nombre),

    // Fonctions + constantes (tout ce qui n’est pas nombre / opérateur)
    // NOTE: c’est l’espace de noms qui décidera à l’évaluation ; ici, aucun nom n’est privilégié.
    Ident(String),

    Plus,
    Minus,
    Star,
    Slash,
    SlashSlash, // //
    Percent,    // modulo (le % “pourcentage” a déjà été réécrit)
    StarStar,   // ** (et ^)

    LPar,
    RPar,
    Comma,
}

/// Tokenize une chaîne (déjà normalisée) en jetons.
/// Supporte:
/// - entiers de taille quelconque (ex: 12, 1_000) ; pas de zéro initial (007 refusé)
/// - flottants (ex: 1.5, .5, 1., 2E10)
/// - opérateurs + - * / // % ** ^   (^ équivaut à **)
/// - parenthèses ( ) et virgule
/// - identifiants [lettre|_][lettre|chiffre|_]* (sensibles à la casse)
///
/// Tout le reste (guillemets, '.', crochets, '=', …) est refusé : pas d’accès
/// aux attributs, pas de chaînes.
pub fn tokenize(s: &str) -> Result<Vec<Tok>, ErreurEval> {
    let mut out = Vec::new();
    let chars: Vec<char> = s.chars().collect();
    let mut i: usize = 0;

    while i < chars.len() {
        let c = chars[i];

        if c.is_whitespace() {
            i += 1;
            continue;
        }

        // Opérateurs (les doubles d’abord)
        let suivant = chars.get(i + 1).copied();
        let op = match (c, suivant) {
            ('*', Some('*')) => Some((Tok::StarStar, 2)),
            ('/', Some('/')) => Some((Tok::SlashSlash, 2)),
            ('^', _) => Some((Tok::StarStar, 1)),
            ('*', _) => Some((Tok::Star, 1)),
            ('/', _) => Some((Tok::Slash, 1)),
            ('+', _) => Some((Tok::Plus, 1)),
            ('-', _) => Some((Tok::Minus, 1)),
            ('%', _) => Some((Tok::Percent, 1)),
            ('(', _) => Some((Tok::LPar, 1)),
            (')', _) => Some((Tok::RPar, 1)),
            (',', _) => Some((Tok::Comma, 1)),
            _ => None,
        };
        if let Some((tok, largeur)) = op {
            out.push(tok);
            i += largeur;
            continue;
        }

        // Nombre : chiffre, ou '.' suivi d’un chiffre
        if c.is_ascii_digit() || (c == '.' && suivant.is_some_and(|d| d.is_ascii_digit())) {
            let (num, fin) = lire_nombre(&chars, i)?;
            out.push(Tok::Num(num));
            i = fin;
            continue;
        }

        // Identifiants
        if c.is_alphabetic() || c == '_' {
            let start = i;
            i += 1;
            while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_') {
                i += 1;
            }
            out.push(Tok::Ident(chars[start..i].iter().collect()));
            continue;
        }

        return Err(ErreurEval::syntaxe(format!("caractère inattendu: '{c}'")));
    }

    Ok(out)
}

/// Lit un littéral numérique à partir de `start`. Renvoie (valeur, index de fin).
fn lire_nombre(chars: &[char], start: usize) -> Result<(Nombre, usize), ErreurEval> {
    let mut i = start;
    let mut texte = String::new();
    let mut flottant = false;

    // partie entière (avec séparateurs '_' entre chiffres)
    lire_chiffres(chars, &mut i, &mut texte)?;
    let partie_entiere = texte.clone();

    // partie fractionnaire
    if chars.get(i) == Some(&'.') {
        flottant = true;
        texte.push('.');
        i += 1;
        if chars.get(i).is_some_and(char::is_ascii_digit) {
            lire_chiffres(chars, &mut i, &mut texte)?;
        }
    }

    // exposant (seul 'E' survit en pratique : "1e5" a déjà été réécrit en "1*e5")
    if matches!(chars.get(i), Some('e' | 'E')) {
        let mut j = i + 1;
        if matches!(chars.get(j), Some('+' | '-')) {
            j += 1;
        }
        if chars.get(j).is_some_and(char::is_ascii_digit) {
            flottant = true;
            texte.push('e');
            texte.extend(chars[i + 1..j].iter().filter(|c| **c == '-'));
            i = j;
            lire_chiffres(chars, &mut i, &mut texte)?;
        }
    }

    // "2x", "1_a", "3.5.1" : littéral mal formé
    if let Some(&c) = chars.get(i) {
        if c.is_alphanumeric() || c == '_' || c == '.' {
            return Err(ErreurEval::syntaxe(format!(
                "littéral numérique invalide près de '{c}'"
            )));
        }
    }

    if flottant {
        let x: f64 = texte
            .parse()
            .map_err(|_| ErreurEval::syntaxe(format!("flottant invalide: {texte}")))?;
        return Ok((Nombre::Reel(x), i));
    }

    if partie_entiere.len() > 1
        && partie_entiere.starts_with('0')
        && partie_entiere.chars().any(|d| d != '0')
    {
        return Err(ErreurEval::syntaxe("zéros initiaux dans un entier"));
    }
    let n = BigInt::parse_bytes(partie_entiere.as_bytes(), 10)
        .ok_or_else(|| ErreurEval::syntaxe(format!("entier invalide: {partie_entiere}")))?;
    Ok((Nombre::Entier(n), i))
}

/// Chiffres ASCII avec '_' autorisé seulement entre deux chiffres.
fn lire_chiffres(chars: &[char], i: &mut usize, texte: &mut String) -> Result<(), ErreurEval> {
    while *i < chars.len() {
        let c = chars[*i];
        if c.is_ascii_digit() {
            texte.push(c);
            *i += 1;
        } else if c == '_' {
            let avant = *i > 0 && chars[*i - 1].is_ascii_digit();
            let apres = chars.get(*i + 1).is_some_and(char::is_ascii_digit);
            if !(avant && apres) {
                return Err(ErreurEval::syntaxe("séparateur '_' mal placé"));
            }
            *i += 1;
        } else {
            break;
        }
    }
    Ok(())
}

/// Format utilitaire (démarche) : liste de jetons en texte.
pub fn format_tokens(tokens: &[Tok]) -> String {
    let mut out = Vec::new();
    for t in tokens {
        let s = match t {
            Tok::Num(n) => n.to_string(),
            Tok::Ident(name) => name.clone(),

            Tok::Plus => "+".to_string(),
            Tok::Minus => "-".to_string(),
            Tok::Star => "*".to_string(),
            Tok::Slash => "/".to_string(),
            Tok::SlashSlash => "//".to_string(),
            Tok::Percent => "%".to_string(),
            Tok::StarStar => "**".to_string(),

            Tok::LPar => "(".to_string(),
            Tok::RPar => ")".to_string(),
            Tok::Comma => ",".to_string(),
        };
        out.push(s);
    }
    out.join(" ")
}
