pub struct Prompts;

impl Prompts {
    /// Instruction block opening every few-shot prompt.
    pub fn instructions() -> &'static str {
        "Tu es un classifieur d'articles. \
Tu dois répondre UNIQUEMENT par «OUI» ou «NON» pour indiquer :

«OUI» si ce sont des articles relatifs à :
- la stratégie
- aux finances de l'entreprise
- aux salariés / syndicats
- les fusions/acquisitions
- les concurrents
- le directoire
- etc.

«NON» si ce sont des articles relatifs à :
- des promotions
- des offres commerciales
- des faits divers
- du sport ou événements sportifs

Voici quelques exemples :

"
    }

    /// Closes the example list and asks for a single-word answer.
    pub fn closing() -> &'static str {
        "Fin des exemples.

Maintenant, analyse l'article ci-dessous et réponds UNIQUEMENT par «OUI» ou «NON».
"
    }

    /// One numbered labelled example. `index` starts at 1.
    pub fn example(index: usize, title: &str, company: &str, comment: &str, label: &str) -> String {
        format!(
            "Exemple {index}:\n\
Titre : \"{title}\"\n\
Entreprise : {company}\n\
Commentaire : {comment}\n\
Pertinent : {label}\n\n"
        )
    }

    /// The article to classify, left open on `Pertinent : ` for the model to complete.
    pub fn article(title: &str, company: &str) -> String {
        format!(
            "-----\n\
Titre : \"{title}\"\n\
Entreprise : {company}\n\
Pertinent : "
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instructions_keep_line_structure() {
        let s = Prompts::instructions();
        assert!(s.starts_with("Tu es un classifieur d'articles. Tu dois répondre"));
        assert!(s.contains("\n- le directoire\n"));
        assert!(s.ends_with("Voici quelques exemples :\n\n"));
    }

    #[test]
    fn example_layout() {
        let s = Prompts::example(3, "Fusion", "ACME", "strat", "OUI");
        assert_eq!(
            s,
            "Exemple 3:\nTitre : \"Fusion\"\nEntreprise : ACME\nCommentaire : strat\nPertinent : OUI\n\n"
        );
    }

    #[test]
    fn article_ends_open() {
        let s = Prompts::article("Grève", "ACME");
        assert_eq!(s, "-----\nTitre : \"Grève\"\nEntreprise : ACME\nPertinent : ");
    }
}
