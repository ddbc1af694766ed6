//! Request bodies for the CVM endpoints, serialized exactly as the registry expects.

use serde::Serialize;

pub const SEARCH_PATH: &str = "fundos/consultar/obter/registros/por/filtro";
pub const REGISTRATION_PATH: &str = "fundos/registrar/obter/consulta";
pub const DOCUMENTS_PATH: &str = "fundos/regulamento/obter/todos";
pub const DOWNLOAD_PATH: &str = "arquivo/download/regulamento/visualizacao";

pub const JSON_CONTENT_TYPE: &str = "application/json;charset=UTF-8";

/// `{"filtro": {"numeroRegistro": "<cnpj>"}}`
#[derive(Debug, Serialize)]
pub struct SearchRequest<'a> {
    pub filtro: SearchFilter<'a>,
}

#[derive(Debug, Serialize)]
pub struct SearchFilter<'a> {
    #[serde(rename = "numeroRegistro")]
    pub registry_number: &'a str,
}

#[derive(Debug, Serialize)]
pub struct RegistrationRef {
    pub id: i64,
}

/// `{"registroFundo": {"id": <id>}}`
#[derive(Debug, Serialize)]
pub struct DocumentsRequest {
    #[serde(rename = "registroFundo")]
    pub registration: RegistrationRef,
}

/// `{"registroFundo": {"id": <id>}, "nomeArquivo": "<file>"}`
#[derive(Debug, Serialize)]
pub struct DownloadRequest<'a> {
    #[serde(rename = "registroFundo")]
    pub registration: RegistrationRef,
    #[serde(rename = "nomeArquivo")]
    pub file_name: &'a str,
}

impl<'a> SearchRequest<'a> {
    pub fn new(cnpj: &'a str) -> Self {
        Self {
            filtro: SearchFilter { registry_number: cnpj },
        }
    }
}

impl DocumentsRequest {
    pub fn new(registration_id: i64) -> Self {
        Self {
            registration: RegistrationRef { id: registration_id },
        }
    }
}

impl<'a> DownloadRequest<'a> {
    pub fn new(registration_id: i64, file_name: &'a str) -> Self {
        Self {
            registration: RegistrationRef { id: registration_id },
            file_name,
        }
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
