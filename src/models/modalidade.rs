//! PNCP contracting modalities (`codigoModalidadeContratacao`).

use serde::{Deserialize, Serialize};

/// Contracting modality as coded by PNCP.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Modalidade {
    LeilaoEletronico,
    DialogoCompetitivo,
    Concurso,
    ConcorrenciaEletronica,
    ConcorrenciaPresencial,
    PregaoEletronico,
    PregaoPresencial,
    DispensaDeLicitacao,
    Inexigibilidade,
    ManifestacaoDeInteresse,
    PreQualificacao,
    Credenciamento,
    LeilaoPresencial,
}

impl Modalidade {
    pub const ALL: [Modalidade; 13] = [
        Self::LeilaoEletronico,
        Self::DialogoCompetitivo,
        Self::Concurso,
        Self::ConcorrenciaEletronica,
        Self::ConcorrenciaPresencial,
        Self::PregaoEletronico,
        Self::PregaoPresencial,
        Self::DispensaDeLicitacao,
        Self::Inexigibilidade,
        Self::ManifestacaoDeInteresse,
        Self::PreQualificacao,
        Self::Credenciamento,
        Self::LeilaoPresencial,
    ];

    pub fn code(&self) -> u32 {
        match self {
            Self::LeilaoEletronico => 1,
            Self::DialogoCompetitivo => 2,
            Self::Concurso => 3,
            Self::ConcorrenciaEletronica => 4,
            Self::ConcorrenciaPresencial => 5,
            Self::PregaoEletronico => 6,
            Self::PregaoPresencial => 7,
            Self::DispensaDeLicitacao => 8,
            Self::Inexigibilidade => 9,
            Self::ManifestacaoDeInteresse => 10,
            Self::PreQualificacao => 11,
            Self::Credenciamento => 12,
            Self::LeilaoPresencial => 13,
        }
    }

    pub fn from_code(code: u32) -> Option<Self> {
        Self::ALL.iter().copied().find(|m| m.code() == code)
    }

    /// Display name used by the PNCP portal.
    pub fn nome(&self) -> &'static str {
        match self {
            Self::LeilaoEletronico => "Leilão - Eletrônico",
            Self::DialogoCompetitivo => "Diálogo Competitivo",
            Self::Concurso => "Concurso",
            Self::ConcorrenciaEletronica => "Concorrência - Eletrônica",
            Self::ConcorrenciaPresencial => "Concorrência - Presencial",
            Self::PregaoEletronico => "Pregão - Eletrônico",
            Self::PregaoPresencial => "Pregão - Presencial",
            Self::DispensaDeLicitacao => "Dispensa de Licitação",
            Self::Inexigibilidade => "Inexigibilidade",
            Self::ManifestacaoDeInteresse => "Manifestação de Interesse",
            Self::PreQualificacao => "Pré-qualificação",
            Self::Credenciamento => "Credenciamento",
            Self::LeilaoPresencial => "Leilão - Presencial",
        }
    }
}
