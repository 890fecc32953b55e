// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! PEG grammar for declaration-level Java.
//!
//! Packages, imports and type declarations (classes, interfaces, enums and
//! annotation types) are parsed into declaration nodes down to fields,
//! methods, parameters and type references. Statement and expression bodies
//! are kept as runs of tokens, grouped by their brackets, which is enough
//! to reprint them exactly and to rename or mark the identifiers in them.
//!
//! Every token records the trivia before it as its prefix. Branches start
//! with an empty prefix; the parser hoists leading trivia up afterwards.

use std::sync::Arc;

use tugrewrite_lst::tree::{Kind, Node, Space};

use crate::build::{
    is_bracket, is_reserved, token, word_kind, Children, DEFAULT_VALUE, MODIFIERS, PRIMITIVES,
};

fn pairs<const N: usize>(rest: Vec<[Arc<Node>; N]>) -> impl Iterator<Item = Arc<Node>> {
    rest.into_iter().flatten()
}

peg::parser! {
    pub(crate) grammar java() for str {
        // --------------------------------------------------------------------
        // Compilation unit
        // --------------------------------------------------------------------

        pub rule compilation_unit() -> Arc<Node>
            = package:package()? imports:import()* types:top_level()* eof:eof() {
                Children::new()
                    .opt(package)
                    .all(imports)
                    .all(types)
                    .one(eof)
                    .build(Kind::SourceFile)
            }

        rule top_level() -> Arc<Node>
            = class_decl() / p(";")

        rule package() -> Arc<Node>
            = annotations:annotation()* k:kw("package") name:qualified_name() end:p(";") {
                Children::new().all(annotations).one(k).one(name).one(end).build(Kind::Package)
            }

        rule import() -> Arc<Node>
            = k:kw("import") s:kw("static")? name:import_name() end:p(";") {
                Children::new().one(k).opt(s).one(name).one(end).build(Kind::Import)
            }

        rule import_name() -> Arc<Node>
            = first:identifier()
              rest:(d:p(".") i:identifier() { [d, i] })*
              star:(d:p(".") s:p("*") { [d, s] })? {
                Children::new()
                    .one(first)
                    .all(pairs(rest))
                    .all(star.into_iter().flatten())
                    .build(Kind::QualifiedName)
            }

        // --------------------------------------------------------------------
        // Type declarations
        // --------------------------------------------------------------------

        rule class_decl() -> Arc<Node>
            = mods:modifiers() k:kw("enum") name:identifier() supers:supertypes()*
              body:enum_body() {
                Children::new()
                    .all(mods)
                    .one(k)
                    .one(name)
                    .all(supers.into_iter().flatten())
                    .one(body)
                    .build(Kind::ClassDecl)
            }
            / mods:modifiers() k:class_keyword() name:identifier() tp:type_parameters()?
              supers:supertypes()* body:class_body() {
                Children::new()
                    .all(mods)
                    .all(k)
                    .one(name)
                    .opt(tp)
                    .all(supers.into_iter().flatten())
                    .one(body)
                    .build(Kind::ClassDecl)
            }

        rule class_keyword() -> Vec<Arc<Node>>
            = k:kw("class") { vec![k] }
            / k:kw("interface") { vec![k] }
            / at:p("@") k:kw("interface") { vec![at, k] }

        rule supertypes() -> Vec<Arc<Node>>
            = k:(kw("extends") / kw("implements") / kw("permits"))
              first:type_ref() rest:(c:p(",") t:type_ref() { [c, t] })* {
                Children::new().one(k).one(first).all(pairs(rest)).into_vec()
            }

        rule class_body() -> Arc<Node>
            = open:p("{") members:member()* close:p("}") {
                Children::new().one(open).all(members).one(close).build(Kind::Block)
            }

        rule enum_body() -> Arc<Node>
            = open:p("{") values:enum_values()? semi:p(";")? members:member()* close:p("}") {
                Children::new()
                    .one(open)
                    .all(values.unwrap_or_default())
                    .opt(semi)
                    .all(members)
                    .one(close)
                    .build(Kind::Block)
            }

        rule enum_values() -> Vec<Arc<Node>>
            = first:enum_value() rest:(c:p(",") v:enum_value() { [c, v] })* trailing:p(",")? {
                Children::new().one(first).all(pairs(rest)).opt(trailing).into_vec()
            }

        rule enum_value() -> Arc<Node>
            = annotations:annotation()* name:identifier() args:paren_group()? body:class_body()? {
                Children::new()
                    .all(annotations)
                    .one(name)
                    .opt(args)
                    .opt(body)
                    .build(Kind::EnumValue)
            }

        rule member() -> Arc<Node>
            = class_decl() / method_decl() / field_decl() / initializer() / p(";")

        rule method_decl() -> Arc<Node>
            = mods:modifiers() tp:type_parameters()? ret:(t:type_ref() &identifier() { t })?
              name:identifier() params:parameters() dims:dims() throws:throws()?
              value:default_value()? body:method_body() {
                Children::new()
                    .all(mods)
                    .opt(tp)
                    .opt(ret)
                    .one(name)
                    .one(params)
                    .all(dims)
                    .opt(throws)
                    .opt(value)
                    .one(body)
                    .build(Kind::MethodDecl)
            }

        rule method_body() -> Arc<Node>
            = block() / p(";")

        rule field_decl() -> Arc<Node>
            = mods:modifiers() ty:type_ref() first:variable()
              rest:(c:p(",") v:variable() { [c, v] })* end:p(";") {
                Children::new()
                    .all(mods)
                    .one(ty)
                    .one(first)
                    .all(pairs(rest))
                    .one(end)
                    .build(Kind::VariableDecl)
            }

        rule variable() -> Arc<Node>
            = name:identifier() dims:dims() init:(eq:p("=") e:expression() { [eq, e] })? {
                Children::new()
                    .one(name)
                    .all(dims)
                    .all(init.into_iter().flatten())
                    .build(Kind::Variable)
            }

        rule initializer() -> Arc<Node>
            = s:kw("static")? body:block() {
                match s {
                    Some(s) => Children::new().one(s).one(body).build(Kind::Statement),
                    None => body,
                }
            }

        #[cache]
        rule modifiers() -> Vec<Arc<Node>>
            = (annotation() / modifier())*

        rule modifier() -> Arc<Node>
            = pre:trivia() w:word() {?
                if MODIFIERS.contains(&w) {
                    Ok(token(Kind::Modifier, pre, w))
                } else {
                    Err("modifier")
                }
            }

        rule annotation() -> Arc<Node>
            = at:p("@") name:qualified_name() args:paren_group()? {
                Children::new().one(at).one(name).opt(args).build(Kind::Annotation)
            }

        // --------------------------------------------------------------------
        // Signatures and types
        // --------------------------------------------------------------------

        rule parameters() -> Arc<Node>
            = open:p("(") list:parameter_list()? close:p(")") {
                Children::new()
                    .one(open)
                    .all(list.unwrap_or_default())
                    .one(close)
                    .build(Kind::Parameters)
            }

        rule parameter_list() -> Vec<Arc<Node>>
            = first:parameter() rest:(c:p(",") q:parameter() { [c, q] })* {
                Children::new().one(first).all(pairs(rest)).into_vec()
            }

        rule parameter() -> Arc<Node>
            = mods:modifiers() ty:type_ref() dots:p("...")? name:identifier() dims:dims() {
                Children::new()
                    .all(mods)
                    .one(ty)
                    .opt(dots)
                    .one(name)
                    .all(dims)
                    .build(Kind::Parameter)
            }

        rule throws() -> Arc<Node>
            = k:kw("throws") first:type_ref() rest:(c:p(",") t:type_ref() { [c, t] })* {
                Children::new().one(k).one(first).all(pairs(rest)).build(Kind::Throws)
            }

        rule default_value() -> Arc<Node>
            = k:kw("default") e:expression() {
                Children::new().one(k).one(e).build(Kind::Custom(DEFAULT_VALUE))
            }

        rule type_ref() -> Arc<Node>
            = base:type_base() dims:dims() {
                Children::new().all(base).all(dims).build(Kind::TypeRef)
            }

        rule type_base() -> Vec<Arc<Node>>
            = t:primitive() { vec![t] }
            / name:qualified_name() args:type_arguments()? {
                Children::new().one(name).opt(args).into_vec()
            }

        rule primitive() -> Arc<Node>
            = pre:trivia() w:word() {?
                if PRIMITIVES.contains(&w) {
                    Ok(token(Kind::Keyword, pre, w))
                } else {
                    Err("primitive type")
                }
            }

        rule dims() -> Vec<Arc<Node>>
            = d:(o:p("[") c:p("]") { [o, c] })* { pairs(d).collect() }

        rule qualified_name() -> Arc<Node>
            = first:identifier() rest:(d:p(".") i:identifier() { [d, i] })* {
                Children::new().one(first).all(pairs(rest)).build(Kind::QualifiedName)
            }

        rule type_arguments() -> Arc<Node>
            = open:p("<") first:type_argument()? rest:(c:p(",") a:type_argument() { (c, a) })*
              close:p(">") {
                let mut children = Children::new().one(open).all(first.unwrap_or_default());
                for (comma, argument) in rest {
                    children = children.one(comma).all(argument);
                }
                children.one(close).build(Kind::TypeArguments)
            }

        rule type_argument() -> Vec<Arc<Node>>
            = q:p("?") bound:(k:(kw("extends") / kw("super")) t:type_ref() { [k, t] })? {
                Children::new().one(q).all(bound.into_iter().flatten()).into_vec()
            }
            / t:type_ref() { vec![t] }

        rule type_parameters() -> Arc<Node>
            = open:p("<") first:type_parameter() rest:(c:p(",") t:type_parameter() { (c, t) })*
              close:p(">") {
                let mut children = Children::new().one(open).all(first);
                for (comma, parameter) in rest {
                    children = children.one(comma).all(parameter);
                }
                children.one(close).build(Kind::TypeParameters)
            }

        rule type_parameter() -> Vec<Arc<Node>>
            = name:identifier() bound:type_bound()? {
                Children::new().one(name).all(bound.unwrap_or_default()).into_vec()
            }

        rule type_bound() -> Vec<Arc<Node>>
            = k:kw("extends") first:type_ref() rest:(a:p("&") t:type_ref() { [a, t] })* {
                Children::new().one(k).one(first).all(pairs(rest)).into_vec()
            }

        // --------------------------------------------------------------------
        // Bodies: blocks, statements, expressions
        // --------------------------------------------------------------------

        #[cache]
        rule block() -> Arc<Node>
            = open:p("{") items:(block() / statement())* close:p("}") {
                Children::new().one(open).all(items).one(close).build(Kind::Block)
            }

        rule statement() -> Arc<Node>
            = items:statement_items() { Children::new().all(items).build(Kind::Statement) }

        // A statement ends at `;`, or at a block that nothing continues.
        rule statement_items() -> Vec<Arc<Node>>
            = end:p(";") { vec![end] }
            / b:block() !statement_continues() { vec![b] }
            / head:statement_atom() rest:statement_items() {
                let mut items = vec![head];
                items.extend(rest);
                items
            }

        rule statement_atom() -> Arc<Node>
            = block() / group() / soup_token()

        rule statement_continues()
            = kw("else") / kw("catch") / kw("finally") / kw("while")
            / p(";") / p(",") / p(".") / p(")")

        rule expression() -> Arc<Node>
            = items:expression_item()+ {
                Children::new().all(items.into_iter().flatten()).build(Kind::Expression)
            }

        rule expression_item() -> Vec<Arc<Node>>
            = n:kw("new") t:type_ref() { vec![n, t] }
            / g:group() { vec![g] }
            / !p(",") !p(";") t:soup_token() { vec![t] }

        rule group() -> Arc<Node>
            = bracket_group()
            / open:p("{") items:group_item()* close:p("}") {
                Children::new().one(open).all(items).one(close).build(Kind::Group)
            }

        rule bracket_group() -> Arc<Node>
            = paren_group()
            / open:p("[") items:group_item()* close:p("]") {
                Children::new().one(open).all(items).one(close).build(Kind::Group)
            }

        rule paren_group() -> Arc<Node>
            = open:p("(") items:group_item()* close:p(")") {
                Children::new().one(open).all(items).one(close).build(Kind::Group)
            }

        rule group_item() -> Arc<Node>
            = group() / soup_token()

        // --------------------------------------------------------------------
        // Tokens
        // --------------------------------------------------------------------

        rule eof() -> Arc<Node>
            = pre:trivia() ![_] { token(Kind::Eof, pre, "") }

        rule soup_token() -> Arc<Node>
            = pre:trivia() t:literal_text() { token(Kind::Literal, pre, t) }
            / pre:trivia() w:word() { token(word_kind(w), pre, w) }
            / pre:trivia() t:punct_text() {?
                if is_bracket(t) {
                    Err("token")
                } else {
                    Ok(token(Kind::Punct, pre, t))
                }
            }

        rule kw(k: &'static str) -> Arc<Node>
            = pre:trivia() w:word() {?
                if w == k {
                    Ok(token(Kind::Keyword, pre, w))
                } else {
                    Err(k)
                }
            }

        rule identifier() -> Arc<Node>
            = pre:trivia() w:word() {?
                if is_reserved(w) {
                    Err("identifier")
                } else {
                    Ok(token(Kind::Identifier, pre, w))
                }
            }

        rule p(s: &'static str) -> Arc<Node>
            = pre:trivia() t:punct_text() {?
                if t == s {
                    Ok(token(Kind::Punct, pre, t))
                } else {
                    Err(s)
                }
            }

        rule word() -> &'input str
            = $([c if c.is_alphabetic() || c == '_' || c == '$']
               [c if c.is_alphanumeric() || c == '_' || c == '$']*)

        rule punct_text() -> &'input str
            = $("..." / "::" / "->"
               / [c if c.is_ascii_punctuation() && !matches!(c, '"' | '\'' | '_' | '$')])

        rule literal_text() -> &'input str
            = $("\"\"\"" (!"\"\"\"" ("\\" [_] / [_]))* "\"\"\"")
            / $("\"" ("\\" [_] / [^ '"' | '\\' | '\n'])* "\"")
            / $("'" ("\\" [_] / [^ '\'' | '\\' | '\n'])+ "'")
            / $(['0'..='9'] [c if c.is_ascii_alphanumeric() || c == '_' || c == '.']*)

        rule trivia() -> Space
            = s:$(trivia_piece()*) {? Space::parse_trivia(s).map_err(|_| "comment") }

        rule trivia_piece()
            = [' ' | '\t' | '\n' | '\r' | '\u{c}']+
            / "//" [^ '\n']*
            / "/*" (!"*/" [_])* "*/"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(node: &Node) -> Vec<Kind> {
        node.children().iter().map(|c| c.kind()).collect()
    }

    #[test]
    fn class_shape() {
        let unit =
            java::compilation_unit("public class A<T> extends B implements C, D {}").unwrap();
        let class = &unit.children()[0];
        assert_eq!(
            kinds(class),
            vec![
                Kind::Modifier,
                Kind::Keyword,
                Kind::Identifier,
                Kind::TypeParameters,
                Kind::Keyword,
                Kind::TypeRef,
                Kind::Keyword,
                Kind::TypeRef,
                Kind::Punct,
                Kind::TypeRef,
                Kind::Block,
            ]
        );
        assert_eq!(kinds(&unit), vec![Kind::ClassDecl, Kind::Eof]);
    }

    #[test]
    fn members_are_told_apart() {
        let unit = java::compilation_unit(
            "class A { int x = 1, y; A() {} void f() throws E; static {} class B {} ; }",
        )
        .unwrap();
        let body = unit.children()[0].children().last().unwrap().clone();
        assert_eq!(
            kinds(&body),
            vec![
                Kind::Punct,
                Kind::VariableDecl,
                Kind::MethodDecl,
                Kind::MethodDecl,
                Kind::Statement,
                Kind::ClassDecl,
                Kind::Punct,
                Kind::Punct,
            ]
        );
        let constructor = &body.children()[2];
        assert_eq!(
            kinds(constructor),
            vec![Kind::Identifier, Kind::Parameters, Kind::Block]
        );
    }

    #[test]
    fn statements_end_at_semicolons_and_blocks() {
        let unit = java::compilation_unit(
            "class A { void f() { if (a) { b(); } else { c(); } int x = {1}[0]; { } } }",
        )
        .unwrap();
        let method = unit.find(|n| n.is(Kind::MethodDecl)).unwrap();
        let body = method.children().last().unwrap();
        assert_eq!(
            kinds(body),
            vec![Kind::Punct, Kind::Statement, Kind::Statement, Kind::Block, Kind::Punct]
        );
        assert_eq!(body.children()[1].tokens_text(), "if(a){b();}else{c();}");
    }

    #[test]
    fn generic_allocations_stay_in_one_variable() {
        let unit =
            java::compilation_unit("class A { Map<K, V> m = new HashMap<K, V>(), n; }").unwrap();
        let field = unit.find(|n| n.is(Kind::VariableDecl)).unwrap();
        assert_eq!(field.children_of_kind(Kind::Variable).count(), 2);
    }

    #[test]
    fn trivia_becomes_prefix() {
        let unit = java::compilation_unit("/* a */ class A {}\n").unwrap();
        let class_keyword = unit.find(|n| n.text() == Some("class")).unwrap();
        let prefix = class_keyword.prefix().unwrap();
        assert_eq!(prefix.comments().len(), 1);
        assert_eq!(prefix.comments()[0].text(), "/* a */");
        let eof = unit.children().last().unwrap();
        assert_eq!(eof.prefix().map(|p| p.whitespace()), Some("\n"));
    }

    #[test]
    fn rejects_garbage() {
        assert!(java::compilation_unit("class {").is_err());
        assert!(java::compilation_unit("class A { /* open").is_err());
        assert!(java::compilation_unit("class A { void f() { \"unterminated }").is_err());
    }
}
