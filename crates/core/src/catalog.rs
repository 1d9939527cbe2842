#![forbid(unsafe_code)]

//! Static schemas for every collection the console manages.
//!
//! Collection keys and field names match the persisted layout of the browser console the
//! data was first captured with, so existing exports load unchanged. Where that layout
//! had two key generations (`tutores` / `tutores_v2`), the newer key is used.

use crate::schema::{
    EntityKind, EntitySchema, FieldDefault, FieldKind, FieldRef, FieldSpec, GroupSpec,
    Projection, ReferenceFollow, ReferenceSpec, SortOrder,
};

const fn field(name: &'static str, kind: FieldKind) -> FieldSpec {
    FieldSpec::new(name, kind)
}

const fn text(name: &'static str) -> FieldSpec {
    FieldSpec::new(name, FieldKind::Text)
}

const fn today(name: &'static str) -> FieldSpec {
    FieldSpec::new(name, FieldKind::Date)
        .required()
        .default_to(FieldDefault::Today)
}

const fn project(from: &'static str, to: &'static str) -> Projection {
    Projection {
        from: FieldRef::One(from),
        to,
    }
}

const TUTOR_FULL_NAME: FieldRef = FieldRef::Joined(&["nome", "sobrenome"]);

const PET_REFERENCE_FIELD: &str = "pet_id";

const TUTOR_REFERENCE: ReferenceSpec = ReferenceSpec {
    field: "tutor_id",
    source: EntityKind::Tutor,
    projections: &[Projection {
        from: TUTOR_FULL_NAME,
        to: "tutor",
    }],
    follow: None,
};

pub static TUTORS: EntitySchema = EntitySchema {
    kind: EntityKind::Tutor,
    collection_key: "tutores_v2",
    id_field: "id_tutor",
    singular: "Tutor",
    label: TUTOR_FULL_NAME,
    fields: &[
        field("nome", FieldKind::PersonName).required(),
        field("sobrenome", FieldKind::PersonName).required(),
        field("cpf", FieldKind::NationalId).required(),
        field("dataNascimento", FieldKind::Date).required(),
        field("telefone", FieldKind::Phone).required(),
        text("rua").required(),
        text("bairro").required(),
        text("numero").required(),
        text("complemento"),
        text("cidade").required(),
        text("estado").required(),
        field("cep", FieldKind::PostalCode).required(),
        field("email", FieldKind::Email).required(),
    ],
    searchable: &[
        TUTOR_FULL_NAME,
        FieldRef::One("email"),
        FieldRef::One("cpf"),
        FieldRef::One("telefone"),
    ],
    sort: SortOrder::Insertion,
    references: &[],
    group: None,
};

pub static PETS: EntitySchema = EntitySchema {
    kind: EntityKind::Pet,
    collection_key: "pets",
    id_field: "id",
    singular: "Pet",
    label: FieldRef::One("nome"),
    fields: &[
        text("nome").required(),
        text("especie").required(),
        text("raca"),
        field("idade", FieldKind::Integer),
        field("sexo", FieldKind::Choice(&["Macho", "Fêmea"])),
        field("tutor_id", FieldKind::Reference),
        text("tutor").required(),
    ],
    searchable: &[
        FieldRef::One("nome"),
        FieldRef::One("especie"),
        FieldRef::One("raca"),
        FieldRef::One("tutor"),
    ],
    sort: SortOrder::Insertion,
    references: &[TUTOR_REFERENCE],
    group: None,
};

pub static APPOINTMENTS: EntitySchema = EntitySchema {
    kind: EntityKind::Appointment,
    collection_key: "consultas_v2",
    id_field: "id_consulta",
    singular: "Appointment",
    label: FieldRef::One("pet"),
    fields: &[
        field(PET_REFERENCE_FIELD, FieldKind::Reference).required(),
        text("pet").required(),
        text("tutor"),
        field("data", FieldKind::Date).required(),
        field("hora", FieldKind::Time).required(),
        text("tipo").required(),
        field(
            "status",
            FieldKind::Choice(&["pendente", "confirmado", "concluido", "cancelado"]),
        )
        .required()
        .default_to(FieldDefault::Literal("pendente")),
        text("veterinario").required(),
    ],
    searchable: &[
        FieldRef::One("pet"),
        FieldRef::One("tutor"),
        FieldRef::One("tipo"),
    ],
    sort: SortOrder::DateTimeAscending {
        date: "data",
        time: "hora",
    },
    references: &[ReferenceSpec {
        field: PET_REFERENCE_FIELD,
        source: EntityKind::Pet,
        projections: &[project("nome", "pet"), project("tutor", "tutor")],
        follow: None,
    }],
    group: None,
};

pub static CLINICAL_CONSULTS: EntitySchema = EntitySchema {
    kind: EntityKind::ClinicalConsult,
    collection_key: "consultas_clinicas_data",
    id_field: "id_consulta",
    singular: "Clinical consult",
    label: FieldRef::One("tutor"),
    fields: &[
        text("motivo_atendimento").required(),
        field("valor_consulta", FieldKind::Decimal).required(),
        field("valor_medicamentos", FieldKind::Decimal),
        text("observacoes"),
        field("tutor_id", FieldKind::Reference),
        text("tutor").required(),
        today("data_hora"),
        field("hora", FieldKind::Time)
            .required()
            .default_to(FieldDefault::Now),
    ],
    searchable: &[FieldRef::One("tutor"), FieldRef::One("motivo_atendimento")],
    sort: SortOrder::Insertion,
    references: &[TUTOR_REFERENCE],
    group: None,
};

pub static EXAM_TYPES: EntitySchema = EntitySchema {
    kind: EntityKind::ExamType,
    collection_key: "exames_data",
    id_field: "id_exame",
    singular: "Exam type",
    label: FieldRef::One("nome"),
    fields: &[
        text("nome").required(),
        text("descricao"),
        text("tipo").required(),
        text("especie").required(),
        field("preco", FieldKind::Decimal).required(),
        text("equipamento"),
        text("duracao"),
        text("recomendacoes_pre"),
        today("data_registro"),
    ],
    searchable: &[
        FieldRef::One("nome"),
        FieldRef::One("tipo"),
        FieldRef::One("especie"),
    ],
    sort: SortOrder::Insertion,
    references: &[],
    group: None,
};

pub static VET_EXAMS: EntitySchema = EntitySchema {
    kind: EntityKind::VetExam,
    collection_key: "exames_veterinarios_data",
    id_field: "id_exame_vet",
    singular: "Exam",
    label: FieldRef::One("animal"),
    fields: &[
        field(PET_REFERENCE_FIELD, FieldKind::Reference).required(),
        text("animal").required(),
        text("tutor").required(),
        text("tipo_exame").required(),
        today("data_exame"),
        text("veterinario_solicitante").required(),
        text("resultados").required(),
        text("observacoes"),
    ],
    searchable: &[
        FieldRef::One("animal"),
        FieldRef::One("tutor"),
        FieldRef::One("tipo_exame"),
    ],
    sort: SortOrder::Insertion,
    references: &[ReferenceSpec {
        field: PET_REFERENCE_FIELD,
        source: EntityKind::Pet,
        projections: &[
            project("nome", "animal"),
            project("tutor", "tutor"),
        ],
        follow: None,
    }],
    group: None,
};

pub static EXAM_LISTS: EntitySchema = EntitySchema {
    kind: EntityKind::ExamList,
    collection_key: "listas_exames_data",
    id_field: "id_lista_exames",
    singular: "Exam list",
    label: FieldRef::One("nome_lista"),
    fields: &[text("nome_lista").required(), field("exames_ids", FieldKind::IdSet)],
    searchable: &[FieldRef::One("nome_lista")],
    sort: SortOrder::Insertion,
    references: &[],
    group: Some(GroupSpec {
        field: "exames_ids",
        target: EntityKind::VetExam,
        target_label: FieldRef::Joined(&["animal", "tipo_exame"]),
        min_selected: 1,
        error_key: "exames",
        error_message: "Select at least one exam for the list.",
    }),
};

pub static VACCINES: EntitySchema = EntitySchema {
    kind: EntityKind::Vaccine,
    collection_key: "vacinas_data",
    id_field: "id_vacina",
    singular: "Vaccine",
    label: FieldRef::One("nome"),
    fields: &[
        text("nome").required(),
        text("descricao"),
        text("especie").required(),
        text("dose").required(),
        text("intervalo"),
        text("fabricante").required(),
        text("lote").required(),
        field("validade", FieldKind::Date).required(),
        field("custo", FieldKind::Decimal).required(),
        text("recomendacoes"),
        today("data_registro"),
    ],
    searchable: &[
        FieldRef::One("nome"),
        FieldRef::One("especie"),
        FieldRef::One("fabricante"),
    ],
    sort: SortOrder::Insertion,
    references: &[],
    group: None,
};

pub static VACCINATIONS: EntitySchema = EntitySchema {
    kind: EntityKind::Vaccination,
    collection_key: "vacina_vermifugos_data",
    id_field: "id_vacina_vermifugo",
    singular: "Vaccination record",
    label: FieldRef::One("nome_animal"),
    fields: &[
        field(PET_REFERENCE_FIELD, FieldKind::Reference).required(),
        text("nome_animal").required(),
        text("especie").required(),
        text("tutor").required(),
        field("tipo", FieldKind::Choice(&["Vacina", "Vermífugo"]))
            .required()
            .default_to(FieldDefault::Literal("Vacina")),
        today("data_aplicacao"),
        field("data_proximo_reforco", FieldKind::Date),
        text("observacoes"),
    ],
    searchable: &[
        FieldRef::One("nome_animal"),
        FieldRef::One("tutor"),
        FieldRef::One("tipo"),
    ],
    sort: SortOrder::Insertion,
    references: &[ReferenceSpec {
        field: PET_REFERENCE_FIELD,
        source: EntityKind::Pet,
        projections: &[
            project("nome", "nome_animal"),
            project("especie", "especie"),
            project("tutor", "tutor"),
        ],
        follow: None,
    }],
    group: None,
};

pub static MEDICATIONS: EntitySchema = EntitySchema {
    kind: EntityKind::Medication,
    collection_key: "medicamentos_v2",
    id_field: "id_medicamento",
    singular: "Medication",
    label: FieldRef::One("nome"),
    fields: &[
        text("nome").required(),
        field("quantidade", FieldKind::Integer).required(),
        text("descricao"),
        text("principio_ativo").required(),
        text("indicacao").required(),
        text("contraindicacoes"),
        text("dose").required(),
        text("administracao").required(),
        text("fabricante").required(),
        field("estoque", FieldKind::Integer).required(),
        field("preco", FieldKind::Decimal).required(),
        field("validade", FieldKind::Date).required(),
        today("data_registro"),
    ],
    searchable: &[
        FieldRef::One("nome"),
        FieldRef::One("principio_ativo"),
        FieldRef::One("fabricante"),
    ],
    sort: SortOrder::Insertion,
    references: &[],
    group: None,
};

pub static SURGERIES: EntitySchema = EntitySchema {
    kind: EntityKind::Surgery,
    collection_key: "cirurgias_data",
    id_field: "id_cirurgia",
    singular: "Surgery",
    label: FieldRef::One("animal"),
    fields: &[
        field(PET_REFERENCE_FIELD, FieldKind::Reference).required(),
        text("animal").required(),
        text("especie").required(),
        text("raca").required(),
        text("tutor").required(),
        text("tipo_cirurgia").required(),
        text("veterinario_responsavel").required(),
        today("data_cirurgia"),
        text("observacoes"),
        text("pos_cirurgicas"),
    ],
    searchable: &[
        FieldRef::One("animal"),
        FieldRef::One("tutor"),
        FieldRef::One("tipo_cirurgia"),
    ],
    sort: SortOrder::Insertion,
    references: &[ReferenceSpec {
        field: PET_REFERENCE_FIELD,
        source: EntityKind::Pet,
        projections: &[
            project("nome", "animal"),
            project("especie", "especie"),
            project("raca", "raca"),
            project("tutor", "tutor"),
        ],
        follow: None,
    }],
    group: None,
};

pub static HOSPITALIZATIONS: EntitySchema = EntitySchema {
    kind: EntityKind::Hospitalization,
    collection_key: "internacoes_data",
    id_field: "id_internacao",
    singular: "Hospitalization",
    label: FieldRef::One("animal"),
    fields: &[
        field(PET_REFERENCE_FIELD, FieldKind::Reference).required(),
        text("animal").required(),
        text("especie").required(),
        text("raca").required(),
        text("motivo_internacao").required(),
        today("data_entrada"),
        field("data_saida", FieldKind::Date),
        text("status_recuperacao")
            .required()
            .default_to(FieldDefault::Literal("Em tratamento")),
        text("observacoes"),
    ],
    searchable: &[
        FieldRef::One("animal"),
        FieldRef::One("motivo_internacao"),
        FieldRef::One("status_recuperacao"),
    ],
    sort: SortOrder::Insertion,
    references: &[ReferenceSpec {
        field: PET_REFERENCE_FIELD,
        source: EntityKind::Pet,
        projections: &[
            project("nome", "animal"),
            project("especie", "especie"),
            project("raca", "raca"),
        ],
        follow: None,
    }],
    group: None,
};

pub static CASTRATION_QUEUE: EntitySchema = EntitySchema {
    kind: EntityKind::CastrationQueue,
    collection_key: "animal_castracao_data",
    id_field: "id_castracao",
    singular: "Castration queue entry",
    label: FieldRef::One("nome_animal"),
    fields: &[
        field(PET_REFERENCE_FIELD, FieldKind::Reference).required(),
        text("nome_animal").required(),
        field("posicao_fila", FieldKind::Integer),
        text("especie").required(),
        text("raca").required(),
        text("sexo").required(),
        field("idade", FieldKind::Integer).required(),
        text("tutor").required(),
        text("status_castracao")
            .required()
            .default_to(FieldDefault::Literal("Aguardando")),
        field("data_prevista_castracao", FieldKind::Date),
    ],
    searchable: &[
        FieldRef::One("nome_animal"),
        FieldRef::One("tutor"),
        FieldRef::One("status_castracao"),
    ],
    sort: SortOrder::Insertion,
    references: &[ReferenceSpec {
        field: PET_REFERENCE_FIELD,
        source: EntityKind::Pet,
        projections: &[
            project("nome", "nome_animal"),
            project("especie", "especie"),
            project("raca", "raca"),
            project("sexo", "sexo"),
            project("idade", "idade"),
            project("tutor", "tutor"),
        ],
        follow: None,
    }],
    group: None,
};

pub static CASTRATION_LISTS: EntitySchema = EntitySchema {
    kind: EntityKind::CastrationList,
    collection_key: "listas_castracao_data",
    id_field: "id_lista",
    singular: "Castration list",
    label: FieldRef::One("nome_lista"),
    fields: &[text("nome_lista").required(), field("animais_ids", FieldKind::IdSet)],
    searchable: &[FieldRef::One("nome_lista")],
    sort: SortOrder::Insertion,
    references: &[],
    group: Some(GroupSpec {
        field: "animais_ids",
        target: EntityKind::CastrationQueue,
        target_label: FieldRef::One("nome_animal"),
        min_selected: 1,
        error_key: "animais",
        error_message: "Select at least one animal for the list.",
    }),
};

pub static PRODUCTS: EntitySchema = EntitySchema {
    kind: EntityKind::Product,
    collection_key: "produtos_data",
    id_field: "id_produto",
    singular: "Product",
    label: FieldRef::One("nome"),
    fields: &[
        text("nome").required(),
        field("quantidade", FieldKind::Integer).required(),
        field("validade", FieldKind::Date).required(),
        text("fornecedor").required(),
        field("quantidade_minima", FieldKind::Integer).required(),
        today("data_ultima_reposicao"),
    ],
    searchable: &[FieldRef::One("nome"), FieldRef::One("fornecedor")],
    sort: SortOrder::Insertion,
    references: &[],
    group: None,
};

pub static STOCKS: EntitySchema = EntitySchema {
    kind: EntityKind::Stock,
    collection_key: "estoques_data",
    id_field: "id_estoque",
    singular: "Stock list",
    label: FieldRef::One("nome_estoque"),
    fields: &[
        text("nome_estoque").required(),
        field("produtos_ids", FieldKind::IdSet),
    ],
    searchable: &[FieldRef::One("nome_estoque")],
    sort: SortOrder::Insertion,
    references: &[],
    group: Some(GroupSpec {
        field: "produtos_ids",
        target: EntityKind::Product,
        target_label: FieldRef::One("nome"),
        min_selected: 1,
        error_key: "produtos",
        error_message: "Select at least one product for the stock.",
    }),
};

pub static TRANSACTIONS: EntitySchema = EntitySchema {
    kind: EntityKind::Transaction,
    collection_key: "transacoes",
    id_field: "id",
    singular: "Transaction",
    label: FieldRef::One("descricao"),
    fields: &[
        text("descricao").required(),
        field("valor", FieldKind::Decimal).required(),
        field("data", FieldKind::Date).required(),
        field("tipo", FieldKind::Choice(&["receita", "despesa"]))
            .required()
            .default_to(FieldDefault::Literal("receita")),
        text("categoria").required(),
        field("status", FieldKind::Choice(&["pago", "pendente", "cancelado"]))
            .required()
            .default_to(FieldDefault::Literal("pendente")),
    ],
    searchable: &[FieldRef::One("descricao"), FieldRef::One("categoria")],
    sort: SortOrder::DateDescending("data"),
    references: &[],
    group: None,
};

pub static ATTENDANCE_REPORTS: EntitySchema = EntitySchema {
    kind: EntityKind::AttendanceReport,
    collection_key: "relatorios_atendimento_data",
    id_field: "id_relatorio",
    singular: "Attendance report",
    label: FieldRef::One("animal"),
    fields: &[
        today("data_atendimento"),
        field("hora_atendimento", FieldKind::Time)
            .required()
            .default_to(FieldDefault::Now),
        text("tipo_atendimento").required(),
        text("vet_responsavel").required(),
        text("diagnostico_inicial"),
        text("observacoes"),
        field(PET_REFERENCE_FIELD, FieldKind::Reference).required(),
        text("animal").required(),
        text("especie").required(),
        text("raca").required(),
        field("idade", FieldKind::Integer).required(),
        text("sexo").required(),
        field("peso", FieldKind::Decimal).required(),
        text("tutor").required(),
        field("telefone_contato", FieldKind::Phone).required(),
        text("procedimento").required(),
        text("medicamentos"),
        text("dosagem"),
        text("frequencia"),
        text("orientacoes_tutor"),
        field("data_retorno", FieldKind::Date),
    ],
    searchable: &[
        FieldRef::One("animal"),
        FieldRef::One("tutor"),
        FieldRef::One("tipo_atendimento"),
    ],
    sort: SortOrder::Insertion,
    references: &[ReferenceSpec {
        field: PET_REFERENCE_FIELD,
        source: EntityKind::Pet,
        projections: &[
            project("nome", "animal"),
            project("especie", "especie"),
            project("raca", "raca"),
            project("idade", "idade"),
            project("sexo", "sexo"),
            project("tutor", "tutor"),
        ],
        follow: Some(ReferenceFollow {
            via: "tutor_id",
            source: EntityKind::Tutor,
            projections: &[project("telefone", "telefone_contato")],
        }),
    }],
    group: None,
};

pub static VETERINARIANS: EntitySchema = EntitySchema {
    kind: EntityKind::Veterinarian,
    collection_key: "veterinarios",
    id_field: "id",
    singular: "Veterinarian",
    label: FieldRef::One("nome"),
    fields: &[
        text("nome").required(),
        text("especialidade").required(),
        text("crmv").required(),
        field("telefone", FieldKind::Phone),
        field("email", FieldKind::Email),
    ],
    searchable: &[
        FieldRef::One("nome"),
        FieldRef::One("especialidade"),
        FieldRef::One("crmv"),
    ],
    sort: SortOrder::Insertion,
    references: &[],
    group: None,
};

pub fn schema_for(kind: EntityKind) -> &'static EntitySchema {
    match kind {
        EntityKind::Tutor => &TUTORS,
        EntityKind::Pet => &PETS,
        EntityKind::Appointment => &APPOINTMENTS,
        EntityKind::ClinicalConsult => &CLINICAL_CONSULTS,
        EntityKind::ExamType => &EXAM_TYPES,
        EntityKind::VetExam => &VET_EXAMS,
        EntityKind::ExamList => &EXAM_LISTS,
        EntityKind::Vaccine => &VACCINES,
        EntityKind::Vaccination => &VACCINATIONS,
        EntityKind::Medication => &MEDICATIONS,
        EntityKind::Surgery => &SURGERIES,
        EntityKind::Hospitalization => &HOSPITALIZATIONS,
        EntityKind::CastrationQueue => &CASTRATION_QUEUE,
        EntityKind::CastrationList => &CASTRATION_LISTS,
        EntityKind::Product => &PRODUCTS,
        EntityKind::Stock => &STOCKS,
        EntityKind::Transaction => &TRANSACTIONS,
        EntityKind::AttendanceReport => &ATTENDANCE_REPORTS,
        EntityKind::Veterinarian => &VETERINARIANS,
    }
}
