//! The MODS v3 term table.
//!
//! Child term names follow the element names (`displayForm`, `subTitle`);
//! attribute-filtered variants get snake_case names (`family_name`,
//! `code_term`).

use super::{AttrFilter, Term};

const fn leaf(name: &'static str, element: &'static str) -> Term {
    Term {
        name,
        element,
        filter: AttrFilter::Any,
        children: &[],
    }
}

const fn typed(name: &'static str, element: &'static str, value: &'static str) -> Term {
    Term {
        name,
        element,
        filter: AttrFilter::Equals("type", value),
        children: &[],
    }
}

const fn branch(name: &'static str, element: &'static str, children: &'static [Term]) -> Term {
    Term {
        name,
        element,
        filter: AttrFilter::Any,
        children,
    }
}

const TITLE_INFO: &[Term] = &[
    leaf("title", "title"),
    leaf("subTitle", "subTitle"),
    leaf("nonSort", "nonSort"),
    leaf("partNumber", "partNumber"),
    leaf("partName", "partName"),
];

const ROLE: &[Term] = &[
    leaf("roleTerm", "roleTerm"),
    typed("code_term", "roleTerm", "code"),
    typed("text_term", "roleTerm", "text"),
];

const NAME: &[Term] = &[
    leaf("namePart", "namePart"),
    leaf("displayForm", "displayForm"),
    leaf("affiliation", "affiliation"),
    leaf("description", "description"),
    leaf("nameIdentifier", "nameIdentifier"),
    branch("role", "role", ROLE),
    typed("family_name", "namePart", "family"),
    typed("given_name", "namePart", "given"),
    typed("terms_of_address", "namePart", "termsOfAddress"),
    typed("date", "namePart", "date"),
];

const LANGUAGE: &[Term] = &[
    leaf("languageTerm", "languageTerm"),
    typed("code_term", "languageTerm", "code"),
    typed("text_term", "languageTerm", "text"),
    leaf("scriptTerm", "scriptTerm"),
];

const PLACE: &[Term] = &[leaf("placeTerm", "placeTerm")];

const ORIGIN_INFO: &[Term] = &[
    branch("place", "place", PLACE),
    leaf("publisher", "publisher"),
    leaf("dateIssued", "dateIssued"),
    leaf("dateCreated", "dateCreated"),
    leaf("dateCaptured", "dateCaptured"),
    leaf("dateValid", "dateValid"),
    leaf("dateModified", "dateModified"),
    leaf("copyrightDate", "copyrightDate"),
    leaf("dateOther", "dateOther"),
    leaf("edition", "edition"),
    leaf("issuance", "issuance"),
    leaf("frequency", "frequency"),
];

const PHYSICAL_DESCRIPTION: &[Term] = &[
    leaf("form", "form"),
    leaf("reformattingQuality", "reformattingQuality"),
    leaf("internetMediaType", "internetMediaType"),
    leaf("extent", "extent"),
    leaf("digitalOrigin", "digitalOrigin"),
    leaf("note", "note"),
];

const HIERARCHICAL_GEOGRAPHIC: &[Term] = &[
    leaf("continent", "continent"),
    leaf("country", "country"),
    leaf("province", "province"),
    leaf("region", "region"),
    leaf("state", "state"),
    leaf("territory", "territory"),
    leaf("county", "county"),
    leaf("city", "city"),
    leaf("citySection", "citySection"),
    leaf("island", "island"),
    leaf("area", "area"),
    leaf("extraterrestrialArea", "extraterrestrialArea"),
];

const CARTOGRAPHICS: &[Term] = &[
    leaf("scale", "scale"),
    leaf("projection", "projection"),
    leaf("coordinates", "coordinates"),
];

const SUBJECT: &[Term] = &[
    leaf("topic", "topic"),
    leaf("geographic", "geographic"),
    leaf("temporal", "temporal"),
    branch("titleInfo", "titleInfo", TITLE_INFO),
    branch("name", "name", NAME),
    leaf("genre", "genre"),
    branch("hierarchicalGeographic", "hierarchicalGeographic", HIERARCHICAL_GEOGRAPHIC),
    branch("cartographics", "cartographics", CARTOGRAPHICS),
    leaf("geographicCode", "geographicCode"),
    leaf("occupation", "occupation"),
];

const LOCATION: &[Term] = &[
    leaf("physicalLocation", "physicalLocation"),
    leaf("shelfLocator", "shelfLocator"),
    leaf("url", "url"),
    leaf("holdingSimple", "holdingSimple"),
    leaf("holdingExternal", "holdingExternal"),
];

const PART_DETAIL: &[Term] = &[
    leaf("number", "number"),
    leaf("caption", "caption"),
    leaf("title", "title"),
];

const PART_EXTENT: &[Term] = &[
    leaf("start", "start"),
    leaf("end", "end"),
    leaf("total", "total"),
    leaf("list", "list"),
];

const PART: &[Term] = &[
    branch("detail", "detail", PART_DETAIL),
    branch("extent", "extent", PART_EXTENT),
    leaf("date", "date"),
    leaf("text", "text"),
];

const RELATED_ITEM: &[Term] = &[
    branch("titleInfo", "titleInfo", TITLE_INFO),
    branch("name", "name", NAME),
    leaf("identifier", "identifier"),
    branch("location", "location", LOCATION),
    leaf("note", "note"),
    branch("part", "part", PART),
];

const RECORD_INFO: &[Term] = &[
    leaf("recordContentSource", "recordContentSource"),
    leaf("recordCreationDate", "recordCreationDate"),
    leaf("recordChangeDate", "recordChangeDate"),
    leaf("recordIdentifier", "recordIdentifier"),
    leaf("recordOrigin", "recordOrigin"),
    branch("languageOfCataloging", "languageOfCataloging", LANGUAGE),
    leaf("descriptionStandard", "descriptionStandard"),
];

/// Top-level terms, resolved against children of the `mods` root element.
pub(super) const MODS_TERMS: &[Term] = &[
    branch("title_info", "titleInfo", TITLE_INFO),
    branch("name", "name", NAME),
    Term {
        name: "personal_name",
        element: "name",
        filter: AttrFilter::Equals("type", "personal"),
        children: NAME,
    },
    Term {
        name: "corporate_name",
        element: "name",
        filter: AttrFilter::Equals("type", "corporate"),
        children: NAME,
    },
    Term {
        name: "conference_name",
        element: "name",
        filter: AttrFilter::Equals("type", "conference"),
        children: NAME,
    },
    leaf("type_of_resource", "typeOfResource"),
    leaf("genre", "genre"),
    branch("origin_info", "originInfo", ORIGIN_INFO),
    branch("language", "language", LANGUAGE),
    branch("physical_description", "physicalDescription", PHYSICAL_DESCRIPTION),
    leaf("abstract", "abstract"),
    leaf("table_of_contents", "tableOfContents"),
    leaf("target_audience", "targetAudience"),
    leaf("note", "note"),
    branch("subject", "subject", SUBJECT),
    leaf("classification", "classification"),
    branch("related_item", "relatedItem", RELATED_ITEM),
    leaf("identifier", "identifier"),
    branch("location", "location", LOCATION),
    leaf("access_condition", "accessCondition"),
    branch("part", "part", PART),
    leaf("extension", "extension"),
    branch("record_info", "recordInfo", RECORD_INFO),
];
