//! The fixed catalog the application starts from.

use crate::models::Module;
use crate::tree::{MenuItem, MenuTree, NodeKind};

fn item(id: &str, name: &str, kind: NodeKind, items: Vec<MenuItem>) -> MenuItem {
    MenuItem {
        id: id.to_string(),
        name: name.to_string(),
        kind,
        items,
        development_status: None,
    }
}

fn menu(id: &str, name: &str) -> MenuItem {
    item(id, name, NodeKind::Menu, vec![])
}

fn menu_with(id: &str, name: &str, items: Vec<MenuItem>) -> MenuItem {
    item(id, name, NodeKind::Menu, items)
}

fn sub(id: &str, name: &str) -> MenuItem {
    item(id, name, NodeKind::Submenu, vec![])
}

fn sub_with(id: &str, name: &str, items: Vec<MenuItem>) -> MenuItem {
    item(id, name, NodeKind::Submenu, items)
}

fn mtype(id: &str, name: &str) -> MenuItem {
    item(id, name, NodeKind::MenuType, vec![])
}

fn stype(id: &str, name: &str) -> MenuItem {
    item(id, name, NodeKind::SubmenuType, vec![])
}

fn module(id: &str, name: &str, color: &str, menus: Vec<MenuItem>) -> Module {
    let mut module = Module::new(id.to_string(), name.to_string(), color.to_string());
    module.menus = MenuTree::from(menus);
    module
}

/// The eight seed modules with their full menu trees.
pub fn modules() -> Vec<Module> {
    vec![
        module(
            "m1",
            "Cadastros",
            "from-blue-600 to-blue-700",
            vec![
                menu_with(
                    "menu1",
                    "Acessos",
                    vec![
                        sub("sub1", "Usuário"),
                        sub("sub2", "Perfil"),
                        sub("sub3", "Permissão"),
                        sub("sub4", "Programa"),
                    ],
                ),
                menu_with(
                    "menu2",
                    "Pessoas (PF/PJ)",
                    vec![
                        mtype("type1", "Motorista"),
                        mtype("type2", "Funcionário"),
                        mtype("type3", "Cliente"),
                        mtype("type4", "Fornecedor"),
                    ],
                ),
                menu_with(
                    "menu3",
                    "Clientes & Contratos",
                    vec![
                        sub("sub5", "Produtos"),
                        sub("sub6", "Tipos de Operação"),
                        sub("sub7", "Regras por Operação e Cliente"),
                        sub("sub8", "Grupo de pessoas"),
                    ],
                ),
                menu_with(
                    "menu4",
                    "Rotas & Corredores",
                    vec![
                        sub_with(
                            "sub9",
                            "Rotas",
                            vec![
                                stype("type5", "Rotas Tronco"),
                                stype("type6", "Rotas complementares"),
                            ],
                        ),
                        sub("sub10", "Checkpoints"),
                    ],
                ),
                menu_with(
                    "menu5",
                    "Referências",
                    vec![
                        sub("sub11", "Aduanas"),
                        sub("sub12", "Geometrias"),
                        sub("sub13", "Postos de Abastecimento"),
                    ],
                ),
                menu_with(
                    "menu6",
                    "Endereço",
                    vec![
                        sub("sub14", "País"),
                        sub("sub15", "Estado"),
                        sub("sub16", "Cidade"),
                    ],
                ),
                menu_with(
                    "menu7",
                    "Comercial",
                    vec![
                        sub_with(
                            "sub17",
                            "Tabela de Frete",
                            vec![
                                stype("type7", "Nacional"),
                                stype("type8", "Internacional"),
                                stype("type9", "Dedicados"),
                                stype("type10", "Fracionado"),
                                stype("type11", "Armazém"),
                                stype("type12", "Container"),
                                stype("type13", "Estadias"),
                            ],
                        ),
                        sub("sub18", "Simulador de Custos"),
                        sub("sub19", "SLA Cliente (meta de cargas)"),
                        sub("sub20", "Comparativo de Tabelas x Custo"),
                    ],
                ),
                menu("menu8", "Centros de Resultado"),
                menu_with(
                    "menu9",
                    "Torre",
                    vec![
                        sub("sub21", "Vínculo Torre"),
                        sub("sub22", "Meta Torre"),
                        sub("sub23", "Montagem de Conjunto"),
                    ],
                ),
                menu_with(
                    "menu10",
                    "Veículos (cavalos, carretas, veículos de passeio)",
                    vec![sub_with(
                        "sub24",
                        "Equipamentos",
                        vec![
                            stype("type14", "Rastreadores"),
                            stype("type15", "Câmeras"),
                            stype("type16", "Refrigeradores"),
                        ],
                    )],
                ),
            ],
        ),
        module(
            "m2",
            "Governança",
            "from-blue-500 to-blue-600",
            vec![
                menu_with(
                    "menu11",
                    "Regras",
                    vec![
                        sub("sub25", "Regras de produtos"),
                        sub("sub26", "Regras para planejamento"),
                        sub("sub27", "Regras de agregamento"),
                        sub("sub28", "Regras de tabelas de agregado"),
                        sub("sub29", "Regras de tabelas de terceiro"),
                        sub("sub30", "Regras lógicas"),
                        sub("sub31", "Regras de senhas"),
                        sub("sub32", "Regras de compras"),
                        sub("sub33", "Regras de hierarquização"),
                    ],
                ),
                menu_with(
                    "menu12",
                    "Qualidade & OEA",
                    vec![
                        sub("sub34", "Requisitos"),
                        sub("sub35", "Checklists"),
                        sub("sub36", "Não Conformidades"),
                    ],
                ),
            ],
        ),
        module(
            "m3",
            "Gestão de Frota",
            "from-blue-700 to-blue-800",
            vec![
                menu_with(
                    "menu13",
                    "Manutenção",
                    vec![sub("sub37", "Ordem de serviço (gera ordem de compra)")],
                ),
                menu("menu14", "Indicadores de Frota (custo/km, TCO)"),
                menu("menu15", "Pneus"),
                menu("menu16", "Relatório"),
            ],
        ),
        module(
            "m4",
            "Agregados e Terceiros",
            "from-sky-600 to-sky-700",
            vec![
                menu("menu17", "Contrato de agregamento"),
                menu("menu18", "Viagens Realizadas"),
                menu("menu19", "Performance"),
                menu("menu20", "Ofertas terceiros"),
                menu("menu21", "Ofertas pedidos internos"),
                menu("menu22", "Pagamentos"),
                menu("menu23", "Relatório"),
            ],
        ),
        module(
            "m5",
            "Gestão de Motoristas",
            "from-blue-600 to-cyan-600",
            vec![
                menu("menu24", "Integração HCM"),
                menu("menu25", "Documentação"),
                menu_with(
                    "menu26",
                    "Eventos & Ocorrências",
                    vec![
                        sub("sub38", "Multas"),
                        sub("sub39", "Sinistros"),
                        sub("sub40", "Violações"),
                        sub("sub41", "Mensagens Autotrac"),
                        sub("sub42", "Histórico de programações enviadas"),
                    ],
                ),
                menu("menu27", "Acerto de Viagem"),
                menu_with(
                    "menu28",
                    "Jornada",
                    vec![sub("sub43", "Programação do condutor")],
                ),
                menu("menu29", "Relatório"),
            ],
        ),
        module(
            "m6",
            "Gestão de Cargas",
            "from-sky-700 to-blue-800",
            vec![
                menu_with("menu30", "Pedidos", vec![sub("sub44", "Alocação de cargas")]),
                menu("menu31", "Cargas"),
                menu("menu32", "Planejamento de Viagem"),
                menu("menu33", "Plano de Viagem (envio ao motorista)"),
                menu("menu34", "Viagens em Andamento"),
                menu("menu35", "Finalização de Viagem"),
                menu("menu36", "Deslocamento Vazio (autorizações)"),
                menu("menu37", "Relatório"),
                menu_with(
                    "menu38",
                    "CSC",
                    vec![
                        sub("sub45", "Devoluções"),
                        sub("sub46", "Pallets"),
                        sub("sub47", "Comprovantes (POD)"),
                        sub("sub48", "Estadias"),
                    ],
                ),
            ],
        ),
        module(
            "m7",
            "Control Tower",
            "from-blue-800 to-blue-900",
            vec![
                menu_with("menu39", "Tracking", vec![sub("sub49", "Linha do Tempo")]),
                menu("menu40", "Advertências"),
                menu("menu41", "Relatório"),
                menu("menu42", "Central de Alertas"),
                menu("menu43", "Indicadores e performance"),
            ],
        ),
        module(
            "m8",
            "BI",
            "from-cyan-700 to-blue-700",
            vec![
                menu("menu44", "Dashboard Operacional"),
                menu("menu45", "Custo por Viagem"),
                menu_with(
                    "menu46",
                    "DRE por",
                    vec![
                        sub("sub50", "Cliente"),
                        sub("sub51", "Rota"),
                        sub("sub52", "Veículo"),
                        sub("sub53", "Motorista"),
                        sub("sub54", "Parceiro"),
                    ],
                ),
                menu("menu47", "Planejado × Realizado"),
            ],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn seed_has_eight_modules_with_unique_ids() {
        let modules = modules();
        assert_eq!(modules.len(), 8);

        let mut module_ids = HashSet::new();
        let mut node_ids = HashSet::new();
        for module in &modules {
            assert!(module_ids.insert(module.id.clone()));
            for (node, _) in module.menus.walk() {
                assert!(node_ids.insert(node.id.clone()), "duplicate {}", node.id);
            }
        }
    }

    #[test]
    fn seed_trees_respect_the_kind_hierarchy() {
        for module in modules() {
            let tree = &module.menus;
            for root in tree.roots() {
                assert_eq!(tree.get(root).unwrap().kind, NodeKind::Menu);
            }
            for (node, depth) in tree.walk() {
                assert!(depth <= 2, "seed nesting stays within three levels");
                for child_id in node.children() {
                    let child = tree.get(child_id).unwrap();
                    assert!(
                        node.kind.allows_child(child.kind),
                        "{} -> {} violates hierarchy",
                        node.id,
                        child.id
                    );
                }
            }
        }
    }

    #[test]
    fn seed_starts_with_no_attachments_or_statuses() {
        for module in modules() {
            assert!(module.notes.is_empty());
            assert!(module.images.is_empty());
            assert!(module.documents.is_empty());
            assert!(module.menus.walk().iter().all(|(n, _)| n.status.is_none()));
        }
    }
}
