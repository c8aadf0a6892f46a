//! Classification prompt.

/// Labels the model must choose between.
pub const LABELS: [&str; 2] = ["produtivo", "improdutivo"];

/// Build the single instruction sent as the user message.
///
/// `email_text` is substituted verbatim; callers guarantee it is non-empty.
pub fn build_prompt(email_text: &str) -> String {
    format!(
        "Analise o seguinte email e classifique como PRODUTIVO (requer ação/resposta) \
         ou IMPRODUTIVO (não requer ação imediata). Em seguida, gere uma resposta \
         profissional e apropriada em português com base na classificação.\n\n\
         Email:\n{email_text}\n\n\
         Responda SOMENTE com um objeto JSON válido, sem nenhum texto adicional, no formato:\n\
         {{\"classification\": \"{productive}\" ou \"{unproductive}\", \"response\": \"sugestão de resposta\"}}",
        productive = LABELS[0],
        unproductive = LABELS[1],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_embeds_email_text() {
        let prompt = build_prompt("Podem revisar o contrato anexo?");
        assert!(prompt.contains("Email:\nPodem revisar o contrato anexo?"));
    }

    #[test]
    fn prompt_names_both_labels_and_schema() {
        let prompt = build_prompt("x");
        assert!(prompt.contains("\"produtivo\""));
        assert!(prompt.contains("\"improdutivo\""));
        assert!(prompt.contains("{\"classification\":"));
        assert!(prompt.contains("\"response\":"));
    }

    #[test]
    fn prompt_keeps_subject_header_ahead_of_body() {
        let prompt = build_prompt("Assunto: Reunião\n\nPodemos remarcar?");
        let subject = prompt.find("Assunto: Reunião").unwrap();
        let body = prompt.find("Podemos remarcar?").unwrap();
        assert!(subject < body);
    }

    #[test]
    fn prompt_is_deterministic() {
        assert_eq!(build_prompt("same"), build_prompt("same"));
    }
}
